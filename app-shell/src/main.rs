use std::sync::Arc;

use app_shell_lib::shell::{
    History, MemoryHistory, RouterConfig, ShellContext, build_menu, create_router,
};
use chrono::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// JSON router configuration, e.g. `{"navigation_policy": "supersede"}`
const CONFIG_ENV: &str = "APP_SHELL_ROUTER_CONFIG";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "app_shell=info,app_shell_lib=info,platform_router=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("app-shell v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match std::env::var(CONFIG_ENV) {
        Ok(json) => RouterConfig::from_json(&json)?,
        Err(_) => RouterConfig::default(),
    };

    let ctx = ShellContext::new();
    let history = Arc::new(MemoryHistory::new("/"));
    let router = Arc::new(create_router(&ctx, config, history.clone())?);

    let mut events = router.subscribe();
    let listener = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::info!(event = event.name(), "router event");
        }
    });

    // Lands on the sign-in view.
    router.start().await?;

    // Rejected: nobody is signed in yet.
    router.navigate_by_path("/clients").await?;

    let session = ctx.session.sign_in("Jane Doe", Duration::hours(8));
    tracing::info!(user = ?session.map(|s| s.user_name), "signed in");

    router.navigate_by_path("/clients/42?platform-chat=open").await?;
    router.navigate_by_path("/clients/42/summary").await?;
    router.update_navigation("/clients/42/summary?tab=audit", true)?;

    if history.back() {
        router.handle_pop_state().await?;
    }

    router.navigate_by_path("/help/about").await?;
    router.navigate_by_path("/no/such/page").await?;

    println!("{}", serde_json::to_string_pretty(&build_menu(&router))?);
    for view in ctx.views.rendered() {
        println!("{} <- {}", view.component, view.context.path_and_query());
    }
    println!("history: {:?}", history.entries());

    drop(router);
    listener.abort();
    Ok(())
}
