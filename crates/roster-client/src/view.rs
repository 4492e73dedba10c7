use crate::form::PersonForm;
use roster_common::Person;

/// Presentation side of the sync client.
///
/// Implementations only display; they never call back into the client.
pub trait View {
    /// Show the record list, replacing whatever was shown before.
    fn render(&mut self, people: &[Person]);
    /// Show the form for editing `id`, or for a new record when `None`.
    fn show_form(&mut self, editing: Option<i64>, form: &PersonForm);
    fn notify_error(&mut self, message: &str);
    /// Ask before a destructive action. `false` cancels it.
    fn confirm(&mut self, prompt: &str) -> bool;
}
