//! `.env` values flow through the figment chain.

use figment::Jail;
use swatch_config::SwatchConfig;

#[test]
fn dotenv_file_sets_config() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "SWATCH_GENERAL__USER=from-dotenv\n")?;
        let config = SwatchConfig::load_with_dotenv().expect("config loads");
        assert_eq!(config.general.user, "from-dotenv");
        Ok(())
    });
}
