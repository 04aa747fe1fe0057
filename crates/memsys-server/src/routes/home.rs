//! Home page: who is signed in and where they may go.

use axum::{routing::get, Extension, Json, Router};
use memsys_core::auth::{is_in_role, Role, SECRETARY_TIER};
use memsys_core::guard::{AccessTier, HOME_PATH};
use memsys_core::Principal;
use serde::Serialize;
use std::sync::Arc;

use crate::middleware::AuthContext;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(HOME_PATH, get(home))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub principal: Principal,
    pub tier: AccessTier,
    pub navigation: Vec<NavItem>,
}

async fn home(Extension(auth): Extension<AuthContext>) -> Json<HomeResponse> {
    let principal = auth.principal;
    Json(HomeResponse {
        tier: AccessTier::of(Some(&principal)),
        navigation: navigation_for(&principal),
        principal,
    })
}

/// Menu entries a principal is allowed to follow
pub fn navigation_for(principal: &Principal) -> Vec<NavItem> {
    let mut items = vec![
        NavItem {
            label: "Participant feedback",
            path: "/feedback/participant",
        },
        NavItem {
            label: "Organizer feedback",
            path: "/feedback/organizer",
        },
    ];

    if is_in_role(Some(principal), SECRETARY_TIER) {
        items.push(NavItem {
            label: "Events",
            path: "/events",
        });
        items.push(NavItem {
            label: "Reports",
            path: "/reports",
        });
    }

    if is_in_role(Some(principal), Role::Admin) {
        items.push(NavItem {
            label: "Users",
            path: "/admin/users",
        });
        items.push(NavItem {
            label: "Locations",
            path: "/admin/locations",
        });
    }

    items
}
