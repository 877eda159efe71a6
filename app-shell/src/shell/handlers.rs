//! Shell routes
//!
//! Define routes here and register them in create_router().

use super::*;
use platform_router::{Guard, Hook};
use std::sync::Arc;
use tracing::{info, warn};

pub const VIEW_LOGIN: &str = "view-login";
pub const VIEW_FORGOT_PASSWORD: &str = "view-forgot-password";
pub const VIEW_ABOUT: &str = "view-about";
pub const VIEW_SETTINGS: &str = "view-settings";
pub const VIEW_CLIENTS: &str = "view-clients";
pub const VIEW_CLIENT_DETAILS: &str = "view-client-details";
pub const VIEW_CLIENT_SUMMARY: &str = "view-client-summary";
pub const VIEW_DASHBOARD: &str = "view-dashboard";

const HELP_PREFIX: &str = "/help/";

// =============================================================================
// Guards and Hooks
// =============================================================================

/// Guard admitting navigation only while a session is active
pub fn require_session(session: SessionService) -> impl Guard {
    move |ctx: NavigationContext| {
        let session = session.clone();
        async move {
            let allowed = session.is_signed_in();
            if !allowed {
                warn!(navigation = %ctx.id, route = %ctx.route_name(), "no active session");
            }
            Ok::<_, RouterError>(allowed)
        }
    }
}

/// Visiting the sign-in page ends the current session
fn end_session(session: SessionService) -> impl Hook {
    move |_ctx: NavigationContext| {
        let session = session.clone();
        async move {
            if let Some(ended) = session.sign_out() {
                info!(user = %ended.user_name, "session ended");
            }
            Ok::<_, RouterError>(())
        }
    }
}

/// Render callback: resolves the route's view and records it
pub fn render_view(views: ViewRegistry) -> impl Hook {
    move |ctx: NavigationContext| {
        let views = views.clone();
        async move {
            let component = ctx.route.load_view().await?;
            info!(
                navigation = %ctx.id,
                component = %component,
                path = %ctx.path_and_query(),
                "view rendered"
            );
            views.record(RenderedView::new(component, ctx));
            Ok::<_, RouterError>(())
        }
    }
}

// =============================================================================
// Router
// =============================================================================

/// Create the shell router
pub fn create_router(
    ctx: &ShellContext,
    config: RouterConfig,
    history: Arc<dyn History>,
) -> RouterResult<Router> {
    let router = Router::with_config(config).with_history(history);
    router.set_on_navigate(render_view(ctx.views.clone()));

    for route in account_routes(ctx)
        .into_iter()
        .chain(help_routes())
        .chain(client_routes(ctx))
    {
        router.add_route(route)?;
    }

    Ok(router)
}

/// Sign-in routes
fn account_routes(ctx: &ShellContext) -> Vec<Route> {
    vec![
        Route::new(VIEW_LOGIN, "/login")
            .title("Sign In")
            .icon("material/home")
            .component("view-login")
            .on_pre_navigate(end_session(ctx.session.clone()))
            .as_default()
            .as_fallback(),
        // Registered last with the fallback flag, so it takes it over.
        Route::new(VIEW_FORGOT_PASSWORD, "/forgot-password")
            .title("Forgot Password")
            .icon("material/home")
            .component("view-home")
            .as_fallback(),
    ]
}

/// Help routes, loaded on demand
fn help_routes() -> Vec<Route> {
    vec![
        Route::new(VIEW_ABOUT, "/help/about")
            .title("About Capitec")
            .lazy(|| async { Ok::<_, RouterError>("view-about".to_string()) }),
        Route::new(VIEW_SETTINGS, "/help/settings")
            .title("Settings")
            .lazy(|| async { Ok::<_, RouterError>("view-settings".to_string()) }),
    ]
}

/// Client management routes, all behind the session guard
fn client_routes(ctx: &ShellContext) -> Vec<Route> {
    let guarded = |route: Route| route.guard(require_session(ctx.session.clone()));

    vec![
        guarded(
            Route::new(VIEW_CLIENTS, "/clients")
                .title("Clients")
                .icon("material/people")
                .component("client-list"),
        ),
        guarded(
            Route::new(VIEW_CLIENT_DETAILS, "/clients/:id")
                .title("Client Details")
                .component("client-details")
                .on_post_navigate(|ctx: NavigationContext| async move {
                    info!(client = ?ctx.path_param("id"), "client opened");
                    Ok::<_, RouterError>(())
                }),
        ),
        guarded(
            Route::new(VIEW_CLIENT_SUMMARY, "/clients/:id/summary")
                .title("Client Summary")
                .component("client-summary"),
        ),
        guarded(
            Route::new(VIEW_DASHBOARD, "/dashboard")
                .title("Dashboard")
                .icon("material/dashboard")
                .lazy(|| async { Ok::<_, RouterError>("pipedrive-dashboard".to_string()) }),
        ),
    ]
}

// =============================================================================
// Menu
// =============================================================================

/// Build the navigation menu from route metadata.
///
/// Routes under `/help/` are collected into one "Help" group placed where the
/// first of them was registered. Routes without a title are left out.
pub fn build_menu(router: &Router) -> Vec<MenuItem> {
    let mut menu = Vec::new();
    let mut help = Vec::new();
    let mut help_at = None;

    for route in router.routes() {
        let Some(title) = route.title.clone() else {
            continue;
        };
        let link = MenuItem::Link {
            name: route.name.clone(),
            title,
            icon: route.icon.clone(),
            path: route.path.clone(),
        };
        if route.path.starts_with(HELP_PREFIX) {
            help_at.get_or_insert(menu.len());
            help.push(link);
        } else {
            menu.push(link);
        }
    }

    if let Some(at) = help_at {
        menu.insert(
            at,
            MenuItem::Group {
                title: "Help".to_string(),
                icon: "material/extension".to_string(),
                items: help,
            },
        );
    }
    menu
}
