//! Runs a parsed command against the store and renders the outcome.

use std::io::{BufRead, Write};

use domain::models::{ClientWithPhones, Phone};
use persistence::ContactStore;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::cli::{client_filter, client_update, new_client, Command};
use crate::error::CliError;
use crate::prompt::confirm;

/// Executes `command`. `input` is only read when a confirmation is needed.
pub async fn run<R: BufRead, W: Write>(
    store: &ContactStore,
    command: Command,
    json_output: bool,
    input: &mut R,
    out: &mut W,
) -> Result<(), CliError> {
    debug!(?command, "Running command");
    match command {
        Command::Init => {
            store.initialize_schema().await?;
            if json_output {
                print_json(out, &json!({ "status": "ok" }))?;
            } else {
                writeln!(out, "Tables created.")?;
            }
        }

        Command::AddClient {
            first_name,
            last_name,
            email,
            phones,
        } => {
            let created = store
                .add_client(&new_client(first_name, last_name, email, phones))
                .await?;
            if json_output {
                print_json(out, &created)?;
            } else {
                writeln!(
                    out,
                    "Client {} {} added with ID {}.",
                    created.client.first_name, created.client.last_name, created.client.id
                )?;
            }
        }

        Command::AddPhone { client_id, phone } => {
            let created = store.add_phone(client_id, &phone).await?;
            if json_output {
                print_json(out, &created)?;
            } else {
                writeln!(
                    out,
                    "Phone {} added to client with ID {}.",
                    created.phone_number, created.client_id
                )?;
            }
        }

        Command::UpdateClient {
            client_id,
            first_name,
            last_name,
            email,
            clear_email,
            phones,
            clear_phones,
        } => {
            let update =
                client_update(first_name, last_name, email, clear_email, phones, clear_phones);
            let updated = store.change_client(client_id, &update).await?;
            if json_output {
                print_json(out, &updated)?;
            } else {
                writeln!(out, "Client with ID {} updated.", client_id)?;
                writeln!(out, "{}", render_client(&updated))?;
            }
        }

        Command::DeletePhone {
            client_id,
            phone,
            yes,
        } => {
            let question = match &phone {
                Some(phone) => format!("Delete phone {} of client with ID {}?", phone, client_id),
                None => format!("Delete all phones of client with ID {}?", client_id),
            };
            if !yes && !confirm(input, out, &question)? {
                writeln!(out, "Deletion cancelled.")?;
                return Ok(());
            }

            let deleted = store.delete_phone(client_id, phone.as_deref()).await?;
            if json_output {
                print_json(out, &json!({ "clientId": client_id, "deleted": deleted }))?;
            } else {
                writeln!(
                    out,
                    "Deleted {} phone(s) of client with ID {}.",
                    deleted, client_id
                )?;
            }
        }

        Command::Show { client_id } => {
            let client = store.get_client(client_id).await?;
            if json_output {
                print_json(out, &client)?;
            } else {
                writeln!(out, "{}", render_client(&client))?;
            }
        }

        Command::Find {
            first_name,
            last_name,
            email,
            phone,
        } => {
            let filter = client_filter(first_name, last_name, email, phone);
            let clients = store.find_clients(&filter).await?;
            if json_output {
                print_json(out, &clients)?;
            } else if clients.is_empty() {
                writeln!(out, "No clients found.")?;
            } else {
                for client in &clients {
                    writeln!(out, "{}", render_client(client))?;
                }
            }
        }
    }
    Ok(())
}

fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// One line per client, e.g. `#1 Katya Ivanova <k@example.com> phones: +1, +2`.
pub fn render_client(client: &ClientWithPhones) -> String {
    let c = &client.client;
    let mut line = format!("#{} {} {}", c.id, c.first_name, c.last_name);
    if let Some(email) = &c.email {
        line.push_str(&format!(" <{}>", email));
    }
    line.push_str(" phones: ");
    line.push_str(&render_phones(&client.phones));
    line
}

fn render_phones(phones: &[Phone]) -> String {
    if phones.is_empty() {
        return "none".to_string();
    }
    phones
        .iter()
        .map(|p| p.phone_number.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::Client;
    use persistence::{DatabaseConfig, StoreError};
    use sqlx::postgres::PgPoolOptions;
    use std::io::Cursor;

    fn katya() -> ClientWithPhones {
        ClientWithPhones {
            client: Client {
                id: 1,
                first_name: "Katya".to_string(),
                last_name: "Ivanova".to_string(),
                email: Some("katyaivanova@example.com".to_string()),
            },
            phones: vec![
                Phone {
                    id: 1,
                    client_id: 1,
                    phone_number: "+123456788".to_string(),
                },
                Phone {
                    id: 2,
                    client_id: 1,
                    phone_number: "+7829282877".to_string(),
                },
            ],
        }
    }

    /// A store whose pool never connects; any database call would fail.
    fn offline_store() -> ContactStore {
        let options = DatabaseConfig::new("contacts", "postgres", "").connect_options();
        ContactStore::new(PgPoolOptions::new().connect_lazy_with(options))
    }

    #[test]
    fn test_render_client_with_email_and_phones() {
        assert_eq!(
            render_client(&katya()),
            "#1 Katya Ivanova <katyaivanova@example.com> phones: +123456788, +7829282877"
        );
    }

    #[test]
    fn test_render_client_without_email_or_phones() {
        let mut client = katya();
        client.client.email = None;
        client.phones.clear();
        assert_eq!(render_client(&client), "#1 Katya Ivanova phones: none");
    }

    #[tokio::test]
    async fn test_declined_delete_does_not_touch_store() {
        let store = offline_store();
        store.close().await;

        let mut input = Cursor::new(b"no\n".to_vec());
        let mut out = Vec::new();
        let command = Command::DeletePhone {
            client_id: 1,
            phone: Some("+123456788".to_string()),
            yes: false,
        };

        // A closed store fails every call, so success proves no call was made
        run(&store, command, false, &mut input, &mut out)
            .await
            .unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("Delete phone +123456788 of client with ID 1? (yes/no): "));
        assert!(output.ends_with("Deletion cancelled.\n"));
    }

    #[tokio::test]
    async fn test_confirmed_delete_reaches_store() {
        let store = offline_store();
        store.close().await;

        let mut input = Cursor::new(b"yes\n".to_vec());
        let mut out = Vec::new();
        let command = Command::DeletePhone {
            client_id: 1,
            phone: None,
            yes: false,
        };

        let err = run(&store, command, false, &mut input, &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Store(StoreError::Closed)));
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Delete all phones of client with ID 1?"));
    }

    #[tokio::test]
    async fn test_yes_flag_skips_prompt() {
        let store = offline_store();
        store.close().await;

        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let command = Command::DeletePhone {
            client_id: 1,
            phone: None,
            yes: true,
        };

        let err = run(&store, command, false, &mut input, &mut out)
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 5);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_is_reported_before_connecting() {
        let store = offline_store();
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let command = Command::AddPhone {
            client_id: 1,
            phone: "call me".to_string(),
        };

        let err = run(&store, command, false, &mut input, &mut out)
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        store.close().await;
    }

    #[test]
    fn test_print_json() {
        let mut out = Vec::new();
        print_json(&mut out, &katya()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["firstName"], "Katya");
        assert_eq!(value["phones"][1]["phoneNumber"], "+7829282877");
    }
}
