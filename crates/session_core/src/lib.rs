use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use shared::{
    domain::{
        CurrentUser, Dashboard, DashboardId, IndexEntry, Organization, PanelData, StreamField,
        UserProfile,
    },
    query::SearchState,
};

pub mod config;

pub use config::{load_settings, Settings};

// Initial width (percent) of the collapsible field-list pane on the search view.
const DEFAULT_SEARCH_SPLIT_PERCENT: i64 = 20;

/// Read side of the local session persistence used to seed a fresh
/// [`SessionState`]. The container only ever loads through this seam;
/// whoever maintains the persisted values writes to the store directly.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load_selected_organization(&self) -> Result<Option<Organization>>;
    async fn load_current_user(&self) -> Result<Option<CurrentUser>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub login_state: bool,
    pub user_info: UserProfile,
}

/// The console's session/UI state: one flat record, owned by the caller
/// and handed by reference to whichever component needs it. Fields are
/// public for reads; updates go through the setter per field, each a
/// verbatim assignment visible to the next read.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub api_endpoint: Url,
    pub user_info: Option<UserProfile>,
    pub logged_in: bool,
    pub loading_state: bool,
    pub error_loading_state: bool,
    pub index_data: Vec<IndexEntry>,
    pub selected_organization: Option<Organization>,
    pub organizations: Vec<Organization>,
    pub current_user: Option<CurrentUser>,
    pub search_collapsible_section: i64,
    pub organization_passcode: String,
    pub all_current_dashboards: HashMap<DashboardId, Dashboard>,
    pub current_selected_dashboard: Option<Dashboard>,
    pub current_panels_data: Vec<PanelData>,
    pub search: SearchState,
    pub stream_fields: Vec<StreamField>,
}

impl SessionState {
    /// Default record at application startup, before any persisted value
    /// has been applied.
    pub fn new(settings: &Settings) -> Self {
        Self {
            api_endpoint: settings.api_endpoint.clone(),
            user_info: None,
            logged_in: false,
            loading_state: true,
            error_loading_state: false,
            index_data: Vec::new(),
            selected_organization: None,
            organizations: Vec::new(),
            current_user: None,
            search_collapsible_section: DEFAULT_SEARCH_SPLIT_PERCENT,
            organization_passcode: String::new(),
            all_current_dashboards: HashMap::new(),
            current_selected_dashboard: None,
            current_panels_data: Vec::new(),
            search: SearchState::default(),
            stream_fields: Vec::new(),
        }
    }

    /// [`SessionState::new`] plus seeding of `selected_organization` and
    /// `current_user` from local persistence. A missing or unreadable
    /// store value leaves the field at its default; an unreadable store
    /// must not prevent the session from starting.
    pub async fn restore(settings: &Settings, store: &dyn SessionStore) -> Self {
        let mut state = Self::new(settings);

        match store.load_selected_organization().await {
            Ok(Some(organization)) => {
                info!(
                    org_id = organization.id.0,
                    identifier = %organization.identifier,
                    "session: restored persisted organization"
                );
                state.selected_organization = Some(organization);
            }
            Ok(None) => {}
            Err(err) => {
                warn!("session: could not load persisted organization, starting empty: {err:#}");
            }
        }

        match store.load_current_user().await {
            Ok(Some(user)) => {
                info!(email = %user.email, "session: restored persisted user");
                state.current_user = Some(user);
            }
            Ok(None) => {}
            Err(err) => {
                warn!("session: could not load persisted user, starting empty: {err:#}");
            }
        }

        state
    }

    /// Applies a login result. A missing payload leaves the session
    /// untouched; the caller signals "nothing happened" that way.
    pub fn login(&mut self, payload: Option<LoginPayload>) {
        let Some(payload) = payload else {
            return;
        };
        self.logged_in = payload.login_state;
        self.user_info = Some(payload.user_info);
    }

    pub fn logout(&mut self) {
        info!("session: logged out");
        self.logged_in = false;
        self.user_info = None;
    }

    pub fn set_user_info(&mut self, user_info: Option<UserProfile>) {
        self.user_info = user_info;
    }

    pub fn set_loading_state(&mut self, loading: bool) {
        self.loading_state = loading;
    }

    pub fn set_error_loading_state(&mut self, errored: bool) {
        self.error_loading_state = errored;
    }

    pub fn set_index_data(&mut self, index_data: Vec<IndexEntry>) {
        self.index_data = index_data;
    }

    pub fn set_selected_organization(&mut self, organization: Option<Organization>) {
        self.selected_organization = organization;
    }

    pub fn set_organizations(&mut self, organizations: Vec<Organization>) {
        self.organizations = organizations;
    }

    pub fn set_current_user(&mut self, user: Option<CurrentUser>) {
        self.current_user = user;
    }

    pub fn set_search_collapse_toggle(&mut self, percent: i64) {
        self.search_collapsible_section = percent;
    }

    pub fn set_organization_passcode(&mut self, passcode: String) {
        self.organization_passcode = passcode;
    }

    pub fn set_all_current_dashboards(&mut self, dashboards: HashMap<DashboardId, Dashboard>) {
        self.all_current_dashboards = dashboards;
    }

    pub fn set_current_selected_dashboard(&mut self, dashboard: Option<Dashboard>) {
        self.current_selected_dashboard = dashboard;
    }

    pub fn set_current_panels_data(&mut self, panels: Vec<PanelData>) {
        self.current_panels_data = panels;
    }

    pub fn set_search(&mut self, search: SearchState) {
        self.search = search;
    }

    pub fn set_stream_fields(&mut self, fields: Vec<StreamField>) {
        self.stream_fields = fields;
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
