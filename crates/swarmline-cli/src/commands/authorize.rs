//! `swarmline authorize` - grant or revoke network access for users

use anyhow::Context;
use clap::Args;
use futures::future::join_all;
use std::path::PathBuf;
use swarmline_core::{Authorizer, AuthorizerFactory, AuthzConfig, Entity, Manifest};

#[derive(Args, Debug)]
pub struct AuthorizeArgs {
    /// User(s) to authorize; space-separated for several at once
    #[arg(long, env = "USER")]
    user: String,

    /// Agent network(s) to authorize; space-separated for several at once.
    /// When not set, all enabled networks from the manifest are used.
    #[arg(long)]
    network: Option<String>,

    /// Manifest file (defaults to the AGENT_MANIFEST_FILE env var)
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Revoke instead of granting
    #[arg(long)]
    revoke: bool,
}

pub async fn run(args: AuthorizeArgs) -> anyhow::Result<i32> {
    let config = AuthzConfig::from_env();
    let authorizer = AuthorizerFactory::create(config.clone())?;
    println!("Using authorizer: {}", config.implementation);

    let networks = network_names(&args)?;
    let users: Vec<&str> = args.user.split_whitespace().collect();

    // Gather everything into one batch so the client is reused throughout
    let mut calls = Vec::new();
    for network in &networks {
        let resource = Entity::new(&config.resource_type, network);
        for user in &users {
            let actor = Entity::new(&config.actor_type, *user);
            for relation in &config.relations {
                calls.push(authorize_one(
                    authorizer.as_ref(),
                    actor.clone(),
                    relation.clone(),
                    resource.clone(),
                    args.revoke,
                ));
            }
        }
    }

    let results = join_all(calls).await;
    let failures = results.iter().filter(|r| r.is_err()).count();
    if failures > 0 {
        eprintln!("{} of {} operations failed", failures, results.len());
        return Ok(1);
    }
    Ok(0)
}

async fn authorize_one(
    authorizer: &dyn Authorizer,
    actor: Entity,
    relation: String,
    resource: Entity,
    revoke: bool,
) -> anyhow::Result<bool> {
    let message = format!("{} {} on {}", actor, relation, resource);
    let (verb, result) = if revoke {
        println!("Attempting to revoke {}", message);
        ("Revoke", authorizer.revoke(&actor, &relation, &resource).await)
    } else {
        println!("Attempting to grant {}", message);
        ("Grant", authorizer.grant(&actor, &relation, &resource).await)
    };

    match result {
        Ok(changed) => {
            let outcome = if changed { "succeeded" } else { "already in place" };
            println!("{} for {} {}", verb, message, outcome);
            Ok(changed)
        }
        Err(e) => {
            eprintln!("{} for {} failed: {}", verb, message, e);
            Err(e.into())
        }
    }
}

fn network_names(args: &AuthorizeArgs) -> anyhow::Result<Vec<String>> {
    if let Some(networks) = &args.network {
        return Ok(networks.split_whitespace().map(str::to_string).collect());
    }

    let manifest = match &args.manifest {
        Some(path) => Manifest::load(path),
        None => Manifest::from_env(),
    }
    .context("no --network given and no manifest available")?;

    Ok(manifest.network_names())
}
