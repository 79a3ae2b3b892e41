// storefront/src/bin/create_admin.rs

//! Provisions an admin account: creates the user if needed, grants the
//! admin role and records it in `admin_users`.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

use horas_storefront::pipelines::admin_pipeline::provision_admin;
use horas_storefront::platform::SupabaseClient;
use horas_storefront::telemetry;

#[derive(Debug, Parser)]
#[command(name = "horas_create_admin", about = "Create or promote a Horas admin account")]
struct Cli {
  /// Admin email address
  #[arg(long)]
  email: String,

  /// Password used when the account does not exist yet
  #[arg(long, env = "HORAS_ADMIN_PASSWORD", hide_env_values = true)]
  password: String,

  #[arg(long, env = "SUPABASE_URL")]
  supabase_url: String,

  #[arg(long, env = "SUPABASE_ANON_KEY")]
  anon_key: String,

  #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
  service_role_key: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();
  telemetry::init_tracing(telemetry::log_format_from_env());
  let cli = Cli::parse();

  let client = SupabaseClient::new(cli.supabase_url, cli.anon_key, Some(cli.service_role_key))
    .context("failed to build the platform client")?;
  let admin = provision_admin(Arc::new(client), &cli.email, &cli.password)
    .await
    .with_context(|| format!("failed to provision admin '{}'", cli.email))?;

  println!("{}", serde_json::json!({ "success": true, "userId": admin.user_id, "created": admin.created }));
  Ok(())
}
