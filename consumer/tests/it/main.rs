#![deny(warnings)]
#![deny(rust_2018_idioms)]

use std::time::Duration;

use ais_consumer::{
    error::Error,
    settings::{Environment, Settings},
    startup::App,
};
use config::{Config, File};

use crate::helper::test_settings;

pub mod consumer;
pub mod helper;

#[test]
fn test_local_settings_are_valid() {
    let settings = Config::builder()
        .add_source(File::with_name("config/local.yml").required(true))
        .set_override("environment", "Local")
        .unwrap()
        .build()
        .unwrap()
        .try_deserialize::<Settings>()
        .unwrap();

    assert_eq!(settings.environment, Environment::Local);
    App::build(&settings).unwrap();
}

#[test]
fn test_development_settings_are_valid() {
    Config::builder()
        .add_source(File::with_name("config/development.yml").required(true))
        .set_override("environment", "Development")
        .unwrap()
        .build()
        .unwrap()
        .try_deserialize::<Settings>()
        .unwrap();
}

#[test]
fn test_production_settings_are_valid() {
    Config::builder()
        .add_source(File::with_name("config/production.yml").required(true))
        .set_override("environment", "Production")
        .unwrap()
        .build()
        .unwrap()
        .try_deserialize::<Settings>()
        .unwrap();
}

#[test]
fn test_invalid_feed_url_is_rejected() {
    assert!(matches!(
        App::build(&test_settings("not a url")),
        Err(Error::InvalidFeedUrl { .. })
    ));
}

#[test]
fn test_zero_emit_interval_is_rejected() {
    let mut settings = test_settings("http://localhost/api/ships");
    settings.emit_interval = Duration::ZERO;

    assert!(matches!(
        App::build(&settings),
        Err(Error::InvalidEmitInterval { .. })
    ));
}

#[test]
fn test_there_is_a_single_snapshot_subscriber() {
    let mut app = App::build(&test_settings("http://localhost/api/ships")).unwrap();

    assert!(app.subscribe().is_some());
    assert!(app.subscribe().is_none());
}
