//! Command-line surface.

use clap::{Parser, Subcommand};
use domain::models::{ClientFilter, ClientUpdate, NewClient};

#[derive(Debug, Parser)]
#[command(
    name = "contact-manager",
    version,
    about = "Manage clients and their phone numbers in PostgreSQL"
)]
pub struct Cli {
    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create the client and phone tables if they do not exist
    Init,

    /// Add a client, optionally with an e-mail and phone numbers
    AddClient {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: Option<String>,
        /// Phone number; repeat for several
        #[arg(long = "phone")]
        phones: Vec<String>,
    },

    /// Add a phone number to an existing client
    AddPhone { client_id: i32, phone: String },

    /// Change some fields of a client
    UpdateClient {
        client_id: i32,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long, conflicts_with = "clear_email")]
        email: Option<String>,
        /// Remove the e-mail address
        #[arg(long)]
        clear_email: bool,
        /// Replacement phone number; repeat for several. Replaces all phones
        #[arg(long = "phone", conflicts_with = "clear_phones")]
        phones: Vec<String>,
        /// Remove every phone number
        #[arg(long)]
        clear_phones: bool,
    },

    /// Delete one phone of a client, or all of them when PHONE is omitted
    DeletePhone {
        client_id: i32,
        phone: Option<String>,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show a client and its phones
    Show { client_id: i32 },

    /// Find clients by exact field values; no filters lists everybody
    Find {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
}

/// Builds the creation command from `add-client` arguments.
pub fn new_client(
    first_name: String,
    last_name: String,
    email: Option<String>,
    phones: Vec<String>,
) -> NewClient {
    let client = NewClient::new(first_name, last_name).with_phones(phones);
    match email {
        Some(email) => client.with_email(email),
        None => client,
    }
}

/// Builds the partial update from `update-client` arguments.
pub fn client_update(
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    clear_email: bool,
    phones: Vec<String>,
    clear_phones: bool,
) -> ClientUpdate {
    let mut update = ClientUpdate::new();
    if let Some(first_name) = first_name {
        update = update.first_name(first_name);
    }
    if let Some(last_name) = last_name {
        update = update.last_name(last_name);
    }
    if clear_email {
        update = update.clear_email();
    } else if let Some(email) = email {
        update = update.email(email);
    }
    if clear_phones {
        update = update.phones(Vec::<String>::new());
    } else if !phones.is_empty() {
        update = update.phones(phones);
    }
    update
}

pub fn client_filter(
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
) -> ClientFilter {
    ClientFilter {
        first_name,
        last_name,
        email,
        phone,
    }
}
