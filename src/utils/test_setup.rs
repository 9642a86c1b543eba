use dotenvy::dotenv;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn setup_test_env() {
    INIT.call_once(|| {
        dotenv().ok();
        if std::env::var("AVALON_ADDR").is_err() {
            std::env::set_var("AVALON_ADDR", "127.0.0.1:0");
        }
        if std::env::var("AVALON_RESOURCES_DIR").is_err() {
            std::env::set_var("AVALON_RESOURCES_DIR", "resources");
        }
    });
}
