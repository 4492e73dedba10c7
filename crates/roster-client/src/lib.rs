// Client side of the roster API.
//
// `SyncClient` keeps a disposable local copy of the record list and never
// patches it in place: every successful write is followed by a full reload
// from the server. The HTTP transport and the user-facing view are injected
// so the same state machine drives the terminal front end and the tests.
pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod sync;
pub mod view;

pub use api::{HttpPeopleApi, PeopleApi};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use form::PersonForm;
pub use sync::SyncClient;
pub use view::View;
