use std::process;

use tokio::runtime::Runtime;

use pacserver::app_context::AppContext;

fn main() -> miette::Result<()> {
    let rt = Runtime::new().expect("failed to build Tokio runtime");

    let mut ctx = rt.block_on(AppContext::bootstrap())?;

    let services = rt.block_on(ctx.build_services())?;

    tracing::info!("Server running (PID: {})", process::id());

    let (mut server, cache, config) = ctx.ready();

    server.bootstrap();
    server.add_services(services);

    if config.do_auto_refresh {
        let _enter = rt.enter();
        cache.spawn_auto_refresh(config.max_cache_age);
        tracing::info!(period_secs = config.max_cache_age.as_secs(), "auto-refresh enabled");
    } else {
        tracing::info!("auto-refresh disabled, serving the initial lookup tree for the life of the process");
    }

    tracing::info!("Starting Pingora Server...");

    server.run_forever();
}
