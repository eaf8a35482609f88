//! Utility functions for the CLI.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use vitotrol_core::{CompletionSignal, Device, Error, MAIN_URL, Session};

use crate::cli::DeviceArgs;
use crate::config::{Config, resolve};
use crate::style;

/// Where and as whom to connect.
#[derive(Clone)]
pub struct Connection {
    pub url: String,
    pub login: String,
    pub password: String,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("url", &self.url)
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Resolve connection settings from arguments, environment and config.
    pub fn resolve(
        url: Option<String>,
        login: Option<String>,
        password: Option<String>,
        config: &Config,
    ) -> Result<Self> {
        let url = resolve(url, config.url.as_ref()).unwrap_or_else(|| MAIN_URL.to_string());
        let Some(login) = resolve(login, config.login.as_ref()) else {
            bail!("No login given. Use --login, set VITOTROL_LOGIN, or add `login` to the config file");
        };
        let Some(password) = resolve(password, config.password.as_ref()) else {
            bail!(
                "No password given. Use --password, set VITOTROL_PASSWORD, or add `password` to the config file"
            );
        };
        Ok(Self {
            url,
            login,
            password,
        })
    }
}

/// Build the device to act on from arguments, environment and config.
pub fn require_device(args: &DeviceArgs, config: &Config) -> Result<Device> {
    let Some(device_id) = resolve(args.device, config.device.as_ref()) else {
        bail!("No device specified. Use --device, set VITOTROL_DEVICE, or add `device` to the config file");
    };
    let Some(location_id) = resolve(args.location, config.location.as_ref()) else {
        bail!(
            "No installation specified. Use --location, set VITOTROL_LOCATION, or add `location` to the config file"
        );
    };
    Ok(Device::new(device_id, location_id))
}

/// Log in with optional progress display.
pub async fn connect_with_progress(
    connection: &Connection,
    show_progress: bool,
) -> Result<Arc<Session>> {
    let session = Session::new(&connection.url)
        .with_context(|| format!("Invalid service URL: {}", connection.url))?;

    let spinner =
        style::operation_spinner(&format!("Logging in as {}...", connection.login), show_progress);
    let result = session
        .login(&connection.login, &connection.password)
        .await;
    if let Some(sp) = spinner {
        sp.finish_and_clear();
    }

    result.with_context(|| format!("Failed to log in as {}", connection.login))?;
    Ok(Arc::new(session))
}

/// Wait for a completion signal with optional progress display.
pub async fn wait_with_progress(
    signal: CompletionSignal,
    timeout: Duration,
    show_progress: bool,
) -> Result<()> {
    let message = format!(
        "Waiting for confirmation of {}...",
        signal.pending().target
    );
    let spinner = style::operation_spinner(&message, show_progress);
    let result = signal.wait_timeout(timeout).await;
    if let Some(sp) = spinner {
        sp.finish_and_clear();
    }

    match result {
        Ok(()) => Ok(()),
        Err(Error::Timeout { duration, .. }) => bail!(
            "No confirmation within {}s. The server may still apply the change later.",
            duration.as_secs()
        ),
        Err(e) if e.is_remote_failure() => {
            Err(e).context("The server could not apply the change")
        }
        Err(e) => Err(e).context("Lost track of the pending change"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitotrol_types::{DeviceId, LocationId};

    fn args(device: Option<u32>, location: Option<u32>) -> DeviceArgs {
        DeviceArgs {
            device: device.map(DeviceId),
            location: location.map(LocationId),
        }
    }

    #[test]
    fn test_require_device_from_args() {
        let device = require_device(&args(Some(1), Some(2)), &Config::default()).unwrap();
        assert_eq!(device, Device::new(1u32, 2u32));
    }

    #[test]
    fn test_require_device_from_config() {
        let config = Config {
            device: Some(DeviceId(3)),
            location: Some(LocationId(4)),
            ..Default::default()
        };
        let device = require_device(&args(None, None), &config).unwrap();
        assert_eq!(device, Device::new(3u32, 4u32));
    }

    #[test]
    fn test_require_device_missing() {
        let err = require_device(&args(None, Some(2)), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("No device specified"));

        let err = require_device(&args(Some(1), None), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("No installation specified"));
    }

    #[test]
    fn test_connection_defaults_to_main_url() {
        let connection = Connection::resolve(
            None,
            Some("user".to_string()),
            Some("pass".to_string()),
            &Config::default(),
        )
        .unwrap();
        assert_eq!(connection.url, MAIN_URL);
        assert!(!format!("{:?}", connection).contains("pass\""));
    }

    #[test]
    fn test_connection_requires_credentials() {
        let err = Connection::resolve(None, None, None, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("No login given"));

        let err =
            Connection::resolve(None, Some("user".to_string()), None, &Config::default())
                .unwrap_err();
        assert!(err.to_string().contains("No password given"));
    }

    #[test]
    fn test_connection_args_override_config() {
        let config = Config {
            url: Some("http://config".to_string()),
            login: Some("config-user".to_string()),
            password: Some("config-pass".to_string()),
            ..Default::default()
        };
        let connection =
            Connection::resolve(Some("http://arg".to_string()), None, None, &config).unwrap();
        assert_eq!(connection.url, "http://arg");
        assert_eq!(connection.login, "config-user");
        assert_eq!(connection.password, "config-pass");
    }

    #[tokio::test]
    async fn test_wait_with_progress_maps_timeout() {
        let signal = vitotrol_core::initiate_and_wait(
            vitotrol_core::ActionTarget::Write {
                device: DeviceId(1),
                location: LocationId(2),
                attr: vitotrol_types::AttrId(3),
            },
            vitotrol_core::WaitConfig::new(Duration::from_secs(3600), Duration::ZERO),
            async { Ok(vitotrol_types::RefreshId::new("r")) },
            |_| async { Ok(vitotrol_types::ActionStatus::Succeeded) },
        )
        .await
        .unwrap();

        let err = wait_with_progress(signal, Duration::from_millis(10), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No confirmation within"));
    }
}
