//! SQL Server connection construction
//!
//! Pure mapping from a [`ConnectionProfile`] to a tiberius configuration,
//! plus the TCP connect itself. Both the SAP source and the Tableau
//! destination use the same driver.

use crate::config::ConnectionProfile;
use anyhow::Context;
use tiberius::{AuthMethod, Client, Config, EncryptionLevel};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

pub type MssqlClient = Client<Compat<TcpStream>>;

/// Build a tiberius configuration from a connection profile.
pub fn mssql_config(profile: &ConnectionProfile) -> Config {
    let mut config = Config::new();
    config.host(&profile.server);
    config.port(profile.port);
    config.database(&profile.database);
    config.authentication(AuthMethod::sql_server(&profile.username, &profile.password));

    if profile.options.encrypt {
        config.encryption(EncryptionLevel::Required);
    } else {
        config.encryption(EncryptionLevel::NotSupported);
    }
    if profile.options.trust_server_certificate {
        config.trust_cert();
    }

    config
}

/// Open a client connection to the given endpoint.
pub async fn connect_mssql(profile: &ConnectionProfile) -> anyhow::Result<MssqlClient> {
    let config = mssql_config(profile);
    let tcp = TcpStream::connect(config.get_addr())
        .await
        .with_context(|| format!("failed to reach {}", config.get_addr()))?;
    tcp.set_nodelay(true)?;

    let client = Client::connect(config, tcp.compat_write())
        .await
        .with_context(|| format!("failed to authenticate against {}", profile.server))?;
    Ok(client)
}
