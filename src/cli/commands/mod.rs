pub mod database; // health, bootstrap
pub mod login;
pub mod routing; // route, relation, models
