//! Profile allowlist/denylist endpoints.

use crate::NextDnsClient;
use nextdns_core::{Domain, ListEntry, ListKind, Result};

/// One list (allow or deny) of one profile.
///
/// Owns a client handle so it can be shared across submission tasks.
#[derive(Debug, Clone)]
pub struct ListApi {
    client: NextDnsClient,
    profile_id: String,
    kind: ListKind,
}

impl ListApi {
    pub(crate) fn new(client: NextDnsClient, profile_id: String, kind: ListKind) -> Self {
        Self {
            client,
            profile_id,
            kind,
        }
    }

    /// Which list this handle writes to
    #[must_use]
    pub const fn kind(&self) -> ListKind {
        self.kind
    }

    /// Request path, `/profiles/{id}/{allowlist|denylist}`
    #[must_use]
    pub fn path(&self) -> String {
        format!("/profiles/{}/{}", self.profile_id, self.kind.path_segment())
    }

    /// Full endpoint URL
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.client.base_url(), self.path())
    }

    /// Add `domain` to the list as an active entry.
    ///
    /// This is an upsert: adding a domain that is already present is not an
    /// error. Returns the response body, or `None` if the API sent none.
    pub async fn add(&self, domain: &Domain) -> Result<Option<String>> {
        self.client
            .post_json(&self.path(), &ListEntry::active(domain))
            .await
    }
}
