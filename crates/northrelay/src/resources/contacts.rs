//! Contacts and contact lists API endpoint

use serde_json::{Value, json};

use super::item_path;
use crate::{
    client::Client,
    error::Result,
    http::ApiRequest,
    types::{
        Contact, ContactList, CreateContactRequest, DataEnvelope, ListContactsParams, PageParams,
        PaginatedResponse,
    },
};

const CONTACTS_PATH: &str = "/api/v1/contacts";
const LISTS_PATH: &str = "/api/v1/contacts/lists";

/// Contacts API resource.
#[derive(Debug, Clone, Copy)]
pub struct Contacts<'a> {
    pub(super) client: &'a Client,
}

impl<'a> Contacts<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List contacts.
    pub async fn list(&self, params: &ListContactsParams) -> Result<PaginatedResponse<Contact>> {
        self.client
            .execute(ApiRequest::get(CONTACTS_PATH).query_params(params)?)
            .await
    }

    /// Create a contact.
    pub async fn create(&self, request: &CreateContactRequest) -> Result<Contact> {
        let envelope: DataEnvelope<Contact> = self
            .client
            .execute(ApiRequest::post(CONTACTS_PATH).json(request)?)
            .await?;
        Ok(envelope.into_inner())
    }

    /// Delete a contact.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .execute_unit(ApiRequest::delete(item_path(CONTACTS_PATH, id)?))
            .await
    }

    /// Create or update many contacts, matched by email.
    pub async fn bulk_upsert(&self, contacts: &[CreateContactRequest]) -> Result<Value> {
        self.client
            .execute(
                ApiRequest::post(format!("{CONTACTS_PATH}/bulk"))
                    .json(&json!({ "contacts": contacts }))?,
            )
            .await
    }

    /// List contact lists.
    pub async fn list_lists(&self, params: PageParams) -> Result<PaginatedResponse<ContactList>> {
        self.client
            .execute(ApiRequest::get(LISTS_PATH).query_params(&params)?)
            .await
    }

    /// Get a contact list.
    pub async fn get_list(&self, list_id: &str) -> Result<ContactList> {
        let envelope: DataEnvelope<ContactList> = self
            .client
            .execute(ApiRequest::get(item_path(LISTS_PATH, list_id)?))
            .await?;
        Ok(envelope.into_inner())
    }

    /// Create a contact list.
    pub async fn create_list(&self, name: &str, description: Option<&str>) -> Result<ContactList> {
        let mut body = json!({ "name": name });
        if let Some(description) = description {
            body["description"] = json!(description);
        }
        let envelope: DataEnvelope<ContactList> = self
            .client
            .execute(ApiRequest::post(LISTS_PATH).json(&body)?)
            .await?;
        Ok(envelope.into_inner())
    }

    /// Delete a contact list. Its contacts are kept.
    pub async fn delete_list(&self, list_id: &str) -> Result<()> {
        self.client
            .execute_unit(ApiRequest::delete(item_path(LISTS_PATH, list_id)?))
            .await
    }

    /// List the contacts in a list.
    pub async fn list_members(
        &self,
        list_id: &str,
        params: PageParams,
    ) -> Result<PaginatedResponse<Contact>> {
        self.client
            .execute(ApiRequest::get(members_path(list_id)?).query_params(&params)?)
            .await
    }

    /// Add contacts to a list.
    pub async fn add_to_list(&self, list_id: &str, contact_ids: &[&str]) -> Result<Value> {
        self.client
            .execute(
                ApiRequest::post(members_path(list_id)?)
                    .json(&json!({ "contactIds": contact_ids }))?,
            )
            .await
    }

    /// Remove contacts from a list.
    pub async fn remove_from_list(&self, list_id: &str, contact_ids: &[&str]) -> Result<()> {
        self.client
            .execute_unit(
                ApiRequest::delete(members_path(list_id)?)
                    .json(&json!({ "contactIds": contact_ids }))?,
            )
            .await
    }
}

fn members_path(list_id: &str) -> Result<String> {
    Ok(format!("{}/members", item_path(LISTS_PATH, list_id)?))
}
