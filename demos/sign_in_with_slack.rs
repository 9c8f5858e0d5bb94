//! Walks through a real "Sign in with Slack" login from the terminal.
//!
//! 1. Export `SLACK_CLIENT_ID`, `SLACK_CLIENT_SECRET`, and `SLACK_REDIRECT_URI` for a Slack app
//!    whose redirect URL matches.
//! 2. Run the demo and open the printed URL.
//! 3. After approving, paste the full redirect URL (it carries `code` and `state`) back into the
//!    terminal.

// std
use std::{env, io};
// crates.io
use color_eyre::{Result, eyre::eyre};
use url::Url;
// self
use slack_oauth2_login::flows::{ClientConfig, SlackProvider};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::new(
		env::var("SLACK_CLIENT_ID")?,
		env::var("SLACK_CLIENT_SECRET")?,
		env::var("SLACK_REDIRECT_URI")?,
	)
	.with_user_scopes(["identity.basic", "identity.email", "identity.team", "identity.avatar"])
	.with_pkce(true);
	let provider = SlackProvider::new(config)?;
	let session = provider.start_authorization();

	println!("Open this URL in a browser:\n\n{}\n", session.authorize_url);
	println!("Paste the URL Slack redirected you to:");

	let mut line = String::new();

	io::stdin().read_line(&mut line)?;

	let callback = Url::parse(line.trim())?;
	let param = |name: &str| {
		callback.query_pairs().find(|(key, _)| key == name).map(|(_, value)| value.into_owned())
	};
	let code = param("code").ok_or_else(|| eyre!("The redirect URL has no `code` parameter."))?;
	let authenticated =
		provider.complete_authorization(&session, param("state").as_deref(), &code).await?;

	println!("Signed in as {:#?}.", authenticated.identity);

	Ok(())
}
