//! Sign-in against the hosted backend or the offline demo

use std::io::{BufRead, Write};
use std::sync::Arc;

use crms_client::auth::load_profile;
use crms_client::{AuthClient, ClientConfig, MemoryTableClient, Session, TableClient};

use crate::console::Console;
use crate::demo;

/// Where sessions and data come from
pub enum Gateway {
    Remote { config: ClientConfig, auth: AuthClient },
    Demo(Arc<MemoryTableClient>),
}

impl Gateway {
    /// Remote when `CRMS_BACKEND_URL` is set, demo otherwise
    pub fn from_env() -> anyhow::Result<Self> {
        if std::env::var_os("CRMS_BACKEND_URL").is_none() {
            tracing::info!("CRMS_BACKEND_URL not set, using demo data");
            return Ok(Self::Demo(Arc::new(demo::seeded_backend())));
        }
        let config = ClientConfig::from_env()?;
        let auth = config.build_auth_client()?;
        tracing::info!(url = %config.base_url(), "Using hosted backend");
        Ok(Self::Remote { config, auth })
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, Self::Demo(_))
    }

    /// Prompt until sign-in succeeds. `None` when the user gives up or
    /// input ends.
    pub async fn sign_in<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> anyhow::Result<Option<(Session, Arc<dyn TableClient>)>> {
        loop {
            let attempt = match self {
                Self::Demo(backend) => {
                    console.say("\nDemo mode: no backend configured.")?;
                    let Some(answer) = console.ask("Sign in as [f]aculty or [a]dmin (q to quit): ")?
                    else {
                        return Ok(None);
                    };
                    match answer.to_ascii_lowercase().as_str() {
                        "q" => return Ok(None),
                        "a" | "admin" => Ok((demo::session(true), backend.clone() as Arc<dyn TableClient>)),
                        _ => Ok((demo::session(false), backend.clone() as Arc<dyn TableClient>)),
                    }
                }
                Self::Remote { config, auth } => {
                    console.say("\nSign in")?;
                    let Some(email) = console.ask("Email (blank to quit): ")? else {
                        return Ok(None);
                    };
                    if email.is_empty() {
                        return Ok(None);
                    }
                    let Some(password) = console.ask("Password: ")? else {
                        return Ok(None);
                    };
                    match auth.sign_in(&email, &password).await {
                        Ok(session) => {
                            let backend = config
                                .build_table_client()?
                                .with_access_token(session.access_token.clone());
                            Ok((session, Arc::new(backend) as Arc<dyn TableClient>))
                        }
                        Err(e) => Err(e),
                    }
                }
            };

            match attempt {
                Ok((session, backend)) => {
                    let session = match load_profile(backend.as_ref(), session.user_id).await {
                        Ok(Some(profile)) => session.with_profile(profile),
                        Ok(None) => session,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to load profile");
                            session
                        }
                    };
                    console.say(format!("Welcome, {}!", session.display_name()))?;
                    return Ok(Some((session, backend)));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Sign-in failed");
                    console.say(format!("Sign-in failed: {e}"))?;
                }
            }
        }
    }

    /// End the session; failures are only logged
    pub async fn sign_out(&self, session: &Session) {
        match self {
            Self::Remote { auth, .. } => {
                if let Err(e) = auth.sign_out(session).await {
                    tracing::warn!(error = %e, "Sign-out failed");
                }
            }
            Self::Demo(_) => tracing::info!(user_id = %session.user_id, "Signed out"),
        }
    }
}
