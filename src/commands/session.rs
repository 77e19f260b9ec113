use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;

use crate::routes;
use crate::state::AppState;

async fn bind(state: &AppState) -> Result<tokio::net::TcpListener> {
    let addr: SocketAddr = format!("{}:{}", state.config.server.host, state.config.server.port)
        .parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);
    Ok(listener)
}

pub async fn serve(state: AppState) -> Result<()> {
    state.content.mount().await;
    let listener = bind(&state).await?;
    axum::serve(listener, routes::app(state)).await?;
    Ok(())
}

/// Serve until the callback commits a session, then shut down.
pub async fn login(state: AppState) -> Result<()> {
    let listener = bind(&state).await?;
    let mut signed_in = state.auth.subscribe();

    println!("Open this address to sign in with Google:");
    println!("  {}", state.config.google_login_url());
    println!(
        "The backend must redirect to {}/login/google-callback",
        state.config.companion_url()
    );

    let shutdown = async move {
        loop {
            if signed_in.changed().await.is_err() {
                return;
            }
            if signed_in.borrow_and_update().is_some() {
                break;
            }
        }
        // Leave the browser time to follow the redirect to the dashboard.
        tokio::time::sleep(Duration::from_secs(2)).await;
    };

    axum::serve(listener, routes::app(state.clone()))
        .with_graceful_shutdown(shutdown)
        .await?;

    match state.auth.current_user() {
        Some(user) => println!("Signed in as {} <{}> ({})", user.name, user.email, user.role.as_str()),
        None => println!("Sign-in did not complete."),
    }
    Ok(())
}

pub fn logout(state: &AppState) -> Result<()> {
    state.auth.logout()?;
    println!("Signed out.");
    Ok(())
}

pub fn whoami(state: &AppState) -> Result<()> {
    match state.auth.current_user() {
        Some(user) => {
            println!("{} <{}>", user.name, user.email);
            println!("id:   {}", user.id);
            println!("role: {}", user.role.as_str());
            println!("since {}", user.last_login.format("%Y-%m-%d %H:%M UTC"));
        }
        None => println!("Not signed in."),
    }
    Ok(())
}
