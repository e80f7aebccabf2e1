use std::fmt;
use std::str::FromStr;

use combobox_types::ComboboxConfig;
use thiserror::Error;

/// The places a combobox is hosted. Each one names its field differently and
/// phrases the rejection message its own way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallSite {
    /// Business service modal on a domain page.
    DomainBusinessService,
    /// Business service modal on the manage-domains table.
    ManageDomainsBusinessService,
    PointOfContact,
    SecurityPointOfContact,
    /// Role filter on the domain history page.
    HistoryRoles,
    /// Domain picker on the domain workflow page.
    WorkflowDomain,
}

#[derive(Debug, Error)]
#[error("unknown call site '{0}' (expected one of: {names})", names = CallSite::names().join(", "))]
pub struct UnknownCallSite(pub String);

impl CallSite {
    pub const ALL: [CallSite; 6] = [
        CallSite::DomainBusinessService,
        CallSite::ManageDomainsBusinessService,
        CallSite::PointOfContact,
        CallSite::SecurityPointOfContact,
        CallSite::HistoryRoles,
        CallSite::WorkflowDomain,
    ];

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|site| site.name()).collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DomainBusinessService => "business-service",
            Self::ManageDomainsBusinessService => "manage-domains",
            Self::PointOfContact => "point-of-contact",
            Self::SecurityPointOfContact => "security-point-of-contact",
            Self::HistoryRoles => "history-roles",
            Self::WorkflowDomain => "workflow-domain",
        }
    }

    pub fn field_label(&self) -> &'static str {
        match self {
            Self::DomainBusinessService | Self::ManageDomainsBusinessService => "Business Service",
            Self::PointOfContact => "Point of Contact",
            Self::SecurityPointOfContact => "Security Point of Contact",
            Self::HistoryRoles => "Role",
            Self::WorkflowDomain => "Domain",
        }
    }

    /// Text appended to the rejection message.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::DomainBusinessService => Some("or clear input before submitting"),
            _ => None,
        }
    }

    /// Whether submitting an empty input clears the value.
    pub fn allow_empty(&self) -> bool {
        !matches!(self, Self::PointOfContact | Self::SecurityPointOfContact)
    }

    /// Filter sites apply a value as soon as it is picked and draw no
    /// Submit button.
    pub fn has_submit_button(&self) -> bool {
        !matches!(self, Self::HistoryRoles | Self::WorkflowDomain)
    }

    /// Whether the site offers the "show all" checkbox that lifts the
    /// known-set restriction.
    pub fn has_show_all_toggle(&self) -> bool {
        matches!(self, Self::DomainBusinessService | Self::ManageDomainsBusinessService)
    }

    /// Combobox configuration for this site, layered over the loaded config.
    /// The loaded config can only tighten what the site allows.
    pub fn config(&self, base: &ComboboxConfig) -> ComboboxConfig {
        base.clone()
            .with_allow_empty_submit(base.allow_empty_submit && self.allow_empty())
            .with_restrict_to_known_set(base.restrict_to_known_set && self.has_show_all_toggle())
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CallSite {
    type Err = UnknownCallSite;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|site| site.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCallSite(s.to_string()))
    }
}
