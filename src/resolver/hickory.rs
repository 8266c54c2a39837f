//! [`TxtResolver`] backed by the system resolver through `hickory-resolver`.

use async_trait::async_trait;
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::rr::rdata::TXT;
use hickory_resolver::proto::rr::Name;
use hickory_resolver::TokioAsyncResolver;
use log::info;

use super::TxtResolver;
use crate::error::{LookupError, ProvisionError};

pub struct HickoryTxtResolver {
    resolver: TokioAsyncResolver,
}

impl HickoryTxtResolver {
    /// Build a resolver from `/etc/resolv.conf` (or the platform equivalent).
    pub fn from_system_conf() -> Result<Self, ProvisionError> {
        let resolver = TokioAsyncResolver::tokio_from_system_conf()?;
        info!("DNS resolver initialised from system configuration");
        Ok(Self { resolver })
    }
}

#[async_trait]
impl TxtResolver for HickoryTxtResolver {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, LookupError> {
        // Query the name as given; search domains must not be appended.
        let mut fqdn = Name::from_ascii(name).map_err(|e| LookupError::InvalidName {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        fqdn.set_fqdn(true);

        match self.resolver.txt_lookup(fqdn).await {
            Ok(lookup) => Ok(lookup.iter().map(txt_to_string).collect()),
            Err(e) => match e.kind() {
                ResolveErrorKind::NoRecordsFound { .. } => {
                    Err(LookupError::NotFound(name.to_string()))
                }
                _ => Err(LookupError::Transport {
                    name: name.to_string(),
                    reason: e.to_string(),
                }),
            },
        }
    }
}

/// A TXT record may be split into several character-strings of up to 255
/// bytes each; they form a single logical value.
fn txt_to_string(txt: &TXT) -> String {
    txt.txt_data()
        .iter()
        .map(|chunk| String::from_utf8_lossy(chunk))
        .collect()
}
