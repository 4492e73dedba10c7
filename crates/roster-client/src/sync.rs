// Sync client state machine.
//
// The cache is a projection of the server list. It is replaced wholesale on
// every reload and cleared on a failed reload; it is never patched in place
// after a write.
use crate::api::PeopleApi;
use crate::error::Result;
use crate::form::PersonForm;
use crate::view::View;
use roster_common::Person;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    pub cache: Vec<Person>,
    /// Id of the record being edited; `None` means the form creates.
    pub edit_buffer: Option<i64>,
    pub form: PersonForm,
}

pub struct SyncClient<A, V> {
    api: A,
    view: V,
    state: ClientState,
}

impl<A: PeopleApi, V: View> SyncClient<A, V> {
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            state: ClientState::default(),
        }
    }

    pub fn cache(&self) -> &[Person] {
        &self.state.cache
    }

    pub fn edit_buffer(&self) -> Option<i64> {
        self.state.edit_buffer
    }

    pub fn form(&self) -> &PersonForm {
        &self.state.form
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Fetch the full list and show it. On any failure the cache is emptied
    /// and an empty list is shown.
    pub async fn reload(&mut self) -> Result<()> {
        match self.api.list().await {
            Ok(people) => {
                tracing::debug!(count = people.len(), "people reloaded");
                self.state.cache = people;
                self.view.render(&self.state.cache);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "people reload failed");
                self.state.cache.clear();
                self.view.render(&self.state.cache);
                self.view.notify_error(&format!("Could not load people: {err}"));
                Err(err)
            }
        }
    }

    /// Create or update from `form`, depending on the edit buffer.
    ///
    /// The form stays in state until the write succeeds, so a rejected or
    /// failed submit can be corrected and retried.
    pub async fn submit(&mut self, form: PersonForm) -> Result<Person> {
        self.state.form = form;
        let fields = match self.state.form.to_fields() {
            Ok(fields) => fields,
            Err(err) => {
                self.view.notify_error(&err.to_string());
                return Err(err.into());
            }
        };
        let result = match self.state.edit_buffer {
            Some(id) => self.api.update(id, &fields).await,
            None => self.api.create(&fields).await,
        };
        match result {
            Ok(person) => {
                tracing::info!(id = person.id, "person saved");
                self.state.edit_buffer = None;
                self.state.form = PersonForm::default();
                // A failed reload is already reported to the view.
                let _ = self.reload().await;
                Ok(person)
            }
            Err(err) => {
                tracing::warn!(error = %err, editing = ?self.state.edit_buffer, "save failed");
                self.view.notify_error(&format!("Could not save: {err}"));
                Err(err)
            }
        }
    }

    /// Load one record into the form and switch to edit mode.
    pub async fn begin_edit(&mut self, id: i64) -> Result<()> {
        match self.api.get(id).await {
            Ok(person) => {
                self.state.edit_buffer = Some(person.id);
                self.state.form = PersonForm::from(&person);
                self.view.show_form(Some(person.id), &self.state.form);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "load for edit failed");
                self.view.notify_error(&format!("Could not load person: {err}"));
                Err(err)
            }
        }
    }

    /// Delete after confirmation. Returns `None` when the user declined,
    /// otherwise the server's deleted count.
    pub async fn delete_record(&mut self, id: i64) -> Result<Option<u64>> {
        if !self.view.confirm(&format!("Delete person {id}?")) {
            return Ok(None);
        }
        match self.api.delete(id).await {
            Ok(deleted) => {
                tracing::info!(id, deleted, "person deleted");
                let _ = self.reload().await;
                Ok(Some(deleted))
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "delete failed");
                self.view.notify_error(&format!("Could not delete: {err}"));
                Err(err)
            }
        }
    }

    /// Case-insensitive name search over the cache. Never hits the network.
    pub fn filter(&self, query: &str) -> Vec<&Person> {
        let needle = query.trim().to_lowercase();
        self.state
            .cache
            .iter()
            .filter(|person| needle.is_empty() || person.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Back to create mode with an empty form.
    pub fn reset_form(&mut self) {
        self.state.edit_buffer = None;
        self.state.form = PersonForm::default();
        self.view.show_form(None, &self.state.form);
    }
}
