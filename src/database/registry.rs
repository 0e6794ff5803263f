use serde::Serialize;

use super::router::{
    ADMINISTRATOR_NAMESPACE, AUTHENTICATION_NAMESPACE, MOVIE_NAMESPACE, NOTIFICATION_NAMESPACE,
    USER_PROFILE_NAMESPACE,
};

/// A model exposed through the admin surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelMeta {
    pub namespace: &'static str,
    pub name: &'static str,
    /// Schema-qualified table, e.g. `content.film_work`
    pub table: &'static str,
}

impl ModelMeta {
    const fn new(namespace: &'static str, name: &'static str, table: &'static str) -> Self {
        Self { namespace, name, table }
    }

    /// `<namespace>.<model>` address used in URLs and the CLI
    pub fn key(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    /// Table reference quoted for interpolation into SQL. Each dotted part
    /// is quoted separately so `schema.table` stays two identifiers.
    pub fn quoted_table(&self) -> String {
        self.table
            .split('.')
            .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(".")
    }
}

pub static MODELS: &[ModelMeta] = &[
    ModelMeta::new(ADMINISTRATOR_NAMESPACE, "user", "administrator_user"),
    ModelMeta::new(AUTHENTICATION_NAMESPACE, "user", "auth.users"),
    ModelMeta::new(AUTHENTICATION_NAMESPACE, "role", "auth.roles"),
    ModelMeta::new(AUTHENTICATION_NAMESPACE, "user_role", "auth.users_roles"),
    ModelMeta::new(AUTHENTICATION_NAMESPACE, "users_history", "auth.users_history"),
    ModelMeta::new(AUTHENTICATION_NAMESPACE, "third_party_user", "auth.third_party_user"),
    ModelMeta::new(MOVIE_NAMESPACE, "genre", "content.genre"),
    ModelMeta::new(MOVIE_NAMESPACE, "film_work", "content.film_work"),
    ModelMeta::new(MOVIE_NAMESPACE, "genre_film_work", "content.genre_film_work"),
    ModelMeta::new(MOVIE_NAMESPACE, "person", "content.person"),
    ModelMeta::new(MOVIE_NAMESPACE, "person_film_work", "content.person_film_work"),
    ModelMeta::new(NOTIFICATION_NAMESPACE, "notification", "notifications.notification"),
    ModelMeta::new(NOTIFICATION_NAMESPACE, "schedule", "notifications.schedule"),
    ModelMeta::new(NOTIFICATION_NAMESPACE, "subscribe", "notifications.subscribe"),
    ModelMeta::new(NOTIFICATION_NAMESPACE, "template", "notifications.template"),
    ModelMeta::new(NOTIFICATION_NAMESPACE, "mail", "notifications.mail"),
    ModelMeta::new(NOTIFICATION_NAMESPACE, "event_notification", "notifications.event_notification"),
    ModelMeta::new(NOTIFICATION_NAMESPACE, "new_film", "notifications.new_film"),
    ModelMeta::new(USER_PROFILE_NAMESPACE, "bookmark", "bookmarks"),
    ModelMeta::new(USER_PROFILE_NAMESPACE, "like", "likes"),
    ModelMeta::new(USER_PROFILE_NAMESPACE, "review", "reviews"),
    ModelMeta::new(USER_PROFILE_NAMESPACE, "user", "users"),
    ModelMeta::new(USER_PROFILE_NAMESPACE, "watch_progress", "watch_progress"),
];

/// Look up a model by its `<namespace>.<model>` key
pub fn find(key: &str) -> Option<&'static ModelMeta> {
    let (namespace, name) = key.split_once('.')?;
    MODELS
        .iter()
        .find(|m| m.namespace == namespace && m.name == name)
}
