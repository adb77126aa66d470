//! Account commands: register, login and user listing.

use crate::config::Mode;
use crate::models::{Project, User, UserProjects};
use crate::storage::{KeyedStore, Storage, generate_id};
use crate::{Error, Result};
use serde::Deserialize;

pub const MISSING_FIELDS: &str = "Missing fields";
pub const USERNAME_TAKEN: &str = "Username already exists";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const REGISTERED: &str = "Registration successful!";
pub const REGISTERED_MINIMAL: &str = "User registered!";
pub const LOGGED_IN: &str = "Login successful!";

/// Username and password as posted by the front end.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default, rename = "UserName", alias = "username")]
    pub username: Option<String>,

    #[serde(default, rename = "Password", alias = "password")]
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Both fields, or a validation error if either is missing or empty.
    pub fn require(&self) -> Result<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Ok((u, p)),
            _ => Err(Error::Validation(MISSING_FIELDS.to_string())),
        }
    }
}

/// Register a new account and return the success message.
///
/// In full mode usernames are unique and each new account gets a
/// "Getting Started" project. In minimal mode the user is appended as-is.
pub fn register(storage: &mut Storage, mode: Mode, credentials: &Credentials) -> Result<&'static str> {
    let (username, password) = credentials.require()?;

    if mode == Mode::Minimal {
        storage.users().append(User::new(username, password))?;
        tracing::info!(username, "registered user");
        return Ok(REGISTERED_MINIMAL);
    }

    let mut users = storage.users();
    if users.get(username)?.is_some() {
        return Err(Error::Conflict(USERNAME_TAKEN.to_string()));
    }
    users.append(User::new(username, password))?;

    // Keep any projects created for this name before it was registered.
    let mut projects = storage.projects();
    if projects.get(username)?.is_none() {
        let mut collection = UserProjects::new(username);
        collection
            .projects
            .push(Project::getting_started(generate_id("prj", username)));
        projects.upsert(collection)?;
    }

    tracing::info!(username, "registered user");
    Ok(REGISTERED)
}

/// Check a username and password against the user store.
pub fn login(storage: &mut Storage, credentials: &Credentials) -> Result<&'static str> {
    let (username, password) = credentials.require()?;

    let matched = storage
        .users()
        .list()?
        .iter()
        .any(|u| u.username == username && u.password == password);

    if matched {
        Ok(LOGGED_IN)
    } else {
        tracing::debug!(username, "login rejected");
        Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()))
    }
}

/// Every stored user, passwords included.
pub fn list_users(storage: &mut Storage) -> Result<Vec<User>> {
    storage.users().list()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageOptions;

    fn storage() -> Storage {
        Storage::in_memory(StorageOptions::default())
    }

    #[test]
    fn test_register_then_duplicate() {
        let mut storage = storage();
        let creds = Credentials::new("ana", "pw");

        assert_eq!(register(&mut storage, Mode::Full, &creds).unwrap(), REGISTERED);
        let err = register(&mut storage, Mode::Full, &Credentials::new("ana", "other")).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        let users = list_users(&mut storage).unwrap();
        assert_eq!(users.iter().filter(|u| u.username == "ana").count(), 1);
        assert_eq!(users[0].password, "pw");
    }

    #[test]
    fn test_register_seeds_getting_started() {
        let mut storage = storage();
        register(&mut storage, Mode::Full, &Credentials::new("ana", "pw")).unwrap();

        let collection = storage.projects().get("ana").unwrap().unwrap();
        assert_eq!(collection.projects.len(), 1);
        let project = &collection.projects[0];
        assert_eq!(project.name, "Getting Started");
        assert_eq!(project.project_type, "Personal");
        assert_eq!(project.priority, "Low");
        assert!(project.tasks.is_empty());
    }

    #[test]
    fn test_register_keeps_existing_collection() {
        let mut storage = storage();
        let mut existing = UserProjects::new("ana");
        existing
            .projects
            .push(Project::getting_started("prj-11111111".to_string()));
        existing.projects[0].name = "Early".to_string();
        storage.projects().upsert(existing).unwrap();

        register(&mut storage, Mode::Full, &Credentials::new("ana", "pw")).unwrap();

        let collection = storage.projects().get("ana").unwrap().unwrap();
        assert_eq!(collection.projects.len(), 1);
        assert_eq!(collection.projects[0].name, "Early");
        assert_eq!(storage.projects().list().unwrap().len(), 1);
    }

    #[test]
    fn test_register_missing_fields() {
        let mut storage = storage();
        for creds in [
            Credentials::default(),
            Credentials::new("", "pw"),
            Credentials::new("ana", ""),
        ] {
            let err = register(&mut storage, Mode::Full, &creds).unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert!(list_users(&mut storage).unwrap().is_empty());
    }

    #[test]
    fn test_minimal_register_allows_duplicates_without_projects() {
        let mut storage = storage();
        let creds = Credentials::new("ana", "pw");
        assert_eq!(
            register(&mut storage, Mode::Minimal, &creds).unwrap(),
            REGISTERED_MINIMAL
        );
        register(&mut storage, Mode::Minimal, &creds).unwrap();

        assert_eq!(list_users(&mut storage).unwrap().len(), 2);
        assert!(storage.projects().list().unwrap().is_empty());
    }

    #[test]
    fn test_login() {
        let mut storage = storage();
        register(&mut storage, Mode::Full, &Credentials::new("ana", "pw")).unwrap();

        assert_eq!(login(&mut storage, &Credentials::new("ana", "pw")).unwrap(), LOGGED_IN);
        assert!(matches!(
            login(&mut storage, &Credentials::new("ana", "wrong")),
            Err(Error::Unauthorized(_))
        ));
        assert!(matches!(
            login(&mut storage, &Credentials::new("bo", "pw")),
            Err(Error::Unauthorized(_))
        ));
        assert!(matches!(
            login(&mut storage, &Credentials::default()),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_login_is_case_sensitive() {
        let mut storage = storage();
        register(&mut storage, Mode::Full, &Credentials::new("Ana", "pw")).unwrap();
        assert!(login(&mut storage, &Credentials::new("ana", "pw")).is_err());
    }

    #[test]
    fn test_credentials_accept_both_casings() {
        let upper: Credentials =
            serde_json::from_str(r#"{"UserName":"ana","Password":"pw"}"#).unwrap();
        let lower: Credentials =
            serde_json::from_str(r#"{"username":"ana","password":"pw"}"#).unwrap();
        assert_eq!(upper.require().unwrap(), ("ana", "pw"));
        assert_eq!(lower.require().unwrap(), ("ana", "pw"));
    }
}
