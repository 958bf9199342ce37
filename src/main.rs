// 📦 Parcel Desk - Interactive Shell
// Role-gated menu loop over the desk: operators run the counter (customers,
// consignments, bills), administrators run the back office (users, pricing,
// resets). Every prompt reads one trimmed line from stdin.

use std::env;
use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use parcel_desk::{
    render, ConsignmentStatus, Desk, Role, SenderInfo, WeightBracket, DEFAULT_ADMIN_PASSWORD,
    DEFAULT_ADMIN_USERNAME, VERSION,
};

fn main() -> Result<()> {
    let data_dir = env::args().nth(1).unwrap_or_else(|| "./data".to_string());

    println!("📦 Parcel Desk v{VERSION}");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut desk =
        Desk::open(&data_dir).with_context(|| format!("opening data directory {data_dir}"))?;
    println!("✓ Collections loaded from {data_dir}");
    if desk.seeded_default_admin() {
        println!(
            "✓ First start: seeded administrator account \
             ({DEFAULT_ADMIN_USERNAME}/{DEFAULT_ADMIN_PASSWORD})"
        );
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        println!();
        let username = prompt(&mut input, "Username (or 'exit' to quit): ")?;
        if username == "exit" {
            break;
        }
        let password = prompt(&mut input, "Password: ")?;

        let Some(user) = desk.login(&username, &password) else {
            println!("Invalid username or password. Please try again.");
            continue;
        };
        println!("✓ Logged in as {} ({})", user.username, user.role.label());

        match user.role {
            Role::Operator => operator_session(&mut desk, &mut input)?,
            Role::Administrator => administrator_session(&mut desk, &mut input)?,
        }
    }

    desk.save_all().context("saving collections")?;
    println!("✓ Collections saved");
    Ok(())
}

// ============================================================================
// OPERATOR MENU
// ============================================================================

fn operator_session(desk: &mut Desk, input: &mut impl BufRead) -> Result<()> {
    loop {
        println!("\nWhat would you like to do?");
        println!("1. Add customer");
        println!("2. Modify customer");
        println!("3. View customers");
        println!("4. Check price");
        println!("5. View parcels");
        println!("6. View bill by consignment");
        println!("7. View bills by customer");
        println!("8. View bills by date range");
        println!("9. Delete a parcel");
        println!("10. Create consignment");
        println!("11. Add parcel to consignment");
        println!("12. Logout");
        let option = prompt(input, "Enter the option number: ")?;

        match option.as_str() {
            "1" => {
                let name = prompt(input, "Enter customer name: ")?;
                let address = prompt(input, "Enter customer address: ")?;
                let telephone = prompt(input, "Enter customer telephone: ")?;
                match desk.add_customer(&name, &address, &telephone) {
                    Ok(id) => println!("✓ Customer added with ID {id}"),
                    Err(err) => println!("{err}"),
                }
            }
            "2" => {
                println!("{}", render::customers_table(&desk.customers().list()));
                let Some(id) = prompt_u64(input, "Enter the customer ID to modify: ")? else {
                    continue;
                };
                let address = prompt(input, "Enter new address: ")?;
                let telephone = prompt(input, "Enter new telephone: ")?;
                match desk.update_customer_contact(id, &address, &telephone) {
                    Ok(()) => println!("✓ Customer {id} updated"),
                    Err(err) => println!("{err}"),
                }
            }
            "3" => {
                if desk.customers().is_empty() {
                    println!("No customers available.");
                } else {
                    println!("{}", render::customers_table(&desk.customers().list()));
                }
            }
            "4" => run_check_price(desk, input)?,
            "5" => {
                let parcels = desk.parcels().list_all();
                if parcels.is_empty() {
                    println!("No parcels available.");
                } else {
                    println!("{}", render::parcels_table(&parcels));
                }
            }
            "6" => {
                let consignment = prompt(input, "Enter the consignment number: ")?;
                run_view_bill(desk, &consignment);
            }
            "7" => {
                let Some(id) = prompt_u64(input, "Enter the customer ID: ")? else {
                    continue;
                };
                match desk.statement_for_customer(id) {
                    Ok(statement) if statement.is_empty() => {
                        println!("No parcels found for customer {id}.");
                    }
                    Ok(statement) => println!("{}", render::customer_statement(&statement)),
                    Err(err) => println!("{err}"),
                }
            }
            "8" => {
                let Some(start) = prompt_date(input, "Enter the start date (YYYY-MM-DD): ")?
                else {
                    continue;
                };
                let Some(end) = prompt_date(input, "Enter the end date (YYYY-MM-DD): ")? else {
                    continue;
                };
                match desk.statement_for_date_range(start, end) {
                    Ok(statement) if statement.is_empty() => {
                        println!("No parcels found between {start} and {end}.");
                    }
                    Ok(statement) => println!("{}", render::date_statement(&statement)),
                    Err(err) => println!("{err}"),
                }
            }
            "9" => {
                let consignment = prompt(input, "Enter the consignment number: ")?;
                match desk.view_bill(&consignment) {
                    Ok(bill) => {
                        println!("{}", render::bill_sheet(&bill));
                        let parcel = prompt(
                            input,
                            "Enter the parcel number to delete within this consignment: ",
                        )?;
                        match desk.delete_parcel(&consignment, &parcel) {
                            Ok(true) => println!(
                                "✓ Parcel {parcel} deleted from consignment {consignment}"
                            ),
                            Ok(false) => println!(
                                "Parcel {parcel} not found in consignment {consignment}."
                            ),
                            Err(err) => println!("{err}"),
                        }
                    }
                    Err(err) => println!("{err}"),
                }
            }
            "10" => {
                println!("{}", render::customers_table(&desk.customers().list()));
                let Some(id) = prompt_u64(input, "Enter the customer ID for consignment: ")?
                else {
                    continue;
                };
                let destination = prompt(input, "Enter destination zone: ")?;
                let Some(weight) = prompt_decimal(input, "Enter weight of the parcel (kg): ")?
                else {
                    continue;
                };
                let sender = prompt_sender(input)?;
                match desk.create_consignment(id, &destination, weight, &sender, today()) {
                    Ok(bill) => {
                        match bill.items.first() {
                            Some(item) => println!(
                                "✓ Consignment created! Number: {}, Parcel Number: {}",
                                bill.consignment_number, item.parcel_number
                            ),
                            None => println!(
                                "✓ Consignment created! Number: {}",
                                bill.consignment_number
                            ),
                        }
                        println!("{}", render::bill_sheet(&bill));
                    }
                    Err(err) => println!("{err}"),
                }
            }
            "11" => {
                let consignment = prompt(input, "Enter the consignment number: ")?;
                let destination = prompt(input, "Enter destination zone: ")?;
                let Some(weight) = prompt_decimal(input, "Enter weight of the parcel (kg): ")?
                else {
                    continue;
                };
                let sender = prompt_sender(input)?;
                match desk.append_to_consignment(
                    &consignment,
                    &destination,
                    weight,
                    &sender,
                    today(),
                ) {
                    Ok(bill) => {
                        match bill.items.last() {
                            Some(item) => println!(
                                "✓ Parcel {} added to consignment {}",
                                item.parcel_number, bill.consignment_number
                            ),
                            None => println!("✓ Parcel added to consignment {consignment}"),
                        }
                        println!("{}", render::bill_sheet(&bill));
                    }
                    Err(err) => println!("{err}"),
                }
            }
            "12" => {
                desk.save_all().context("saving collections")?;
                println!("✓ Collections saved");
                println!("Logging out...");
                return Ok(());
            }
            _ => println!("Invalid option!"),
        }
    }
}

// ============================================================================
// ADMINISTRATOR MENU
// ============================================================================

fn administrator_session(desk: &mut Desk, input: &mut impl BufRead) -> Result<()> {
    loop {
        println!("\nWhat would you like to do?");
        println!("1. Add user");
        println!("2. Assign administrator role");
        println!("3. Remove administrator role");
        println!("4. Delete user");
        println!("5. List of users");
        println!("6. Show pricing table");
        println!("7. Modify pricing");
        println!("8. Delete pricing");
        println!("9. Check price");
        println!("10. Reset parcels and bills");
        println!("11. Delete customer");
        println!("12. Logout");
        let option = prompt(input, "Enter the option number: ")?;

        match option.as_str() {
            "1" => {
                let username = prompt(input, "Enter the username for the new user: ")?;
                let password = prompt(input, "Enter the password for the new user: ")?;
                let role = prompt(input, "Enter the role (operator/administrator, default operator): ")?;
                let role = match role.to_lowercase().as_str() {
                    "administrator" | "admin" => Role::Administrator,
                    _ => Role::Operator,
                };
                match desk.add_user(&username, &password, role) {
                    Ok(true) => println!("✓ User {username} added"),
                    Ok(false) => println!("Username {username} is blank or already taken."),
                    Err(err) => println!("{err}"),
                }
            }
            "2" => {
                let operators = desk.users().by_role(Role::Operator);
                if operators.is_empty() {
                    println!("No operators available to assign as administrators.");
                    continue;
                }
                println!("{}", render::users_table(&operators));
                let username = prompt(input, "Enter the username to assign: ")?;
                match desk.assign_admin(&username) {
                    Ok(true) => println!("✓ {username} is now an administrator"),
                    Ok(false) => println!("{username} is already an administrator."),
                    Err(err) => println!("{err}"),
                }
            }
            "3" => {
                let admins = desk.users().by_role(Role::Administrator);
                if admins.is_empty() {
                    println!("No administrators available to remove the role.");
                    continue;
                }
                println!("{}", render::users_table(&admins));
                let username = prompt(input, "Enter the username to demote: ")?;
                match desk.remove_admin(&username) {
                    Ok(true) => println!("✓ {username} is now an operator"),
                    Ok(false) => println!("{username} is not an administrator."),
                    Err(err) => println!("{err}"),
                }
            }
            "4" => {
                if desk.users().is_empty() {
                    println!("No users available to delete.");
                    continue;
                }
                println!("{}", render::users_table(desk.users().records()));
                let username = prompt(input, "Enter the username to delete: ")?;
                match desk.remove_user(&username) {
                    Ok(dropped) => println!("✓ User {} deleted", dropped.username),
                    Err(err) => println!("{err}"),
                }
            }
            "5" => {
                let filter = prompt(input, "Filter users by role (admin/operator/all): ")?;
                let users = match filter.to_lowercase().as_str() {
                    "admin" | "administrator" => desk.users().by_role(Role::Administrator),
                    "operator" => desk.users().by_role(Role::Operator),
                    "all" => desk.users().records().to_vec(),
                    _ => {
                        println!("Invalid filter option!");
                        continue;
                    }
                };
                if users.is_empty() {
                    println!("No users available.");
                } else {
                    println!("{}", render::users_table(&users));
                }
            }
            "6" => {
                println!("Current pricing table:");
                println!("{}", render::pricing_table(desk.pricing()));
            }
            "7" => {
                let zone = prompt(input, "Enter the zone to modify: ")?;
                let Some(bracket) = prompt_bracket(input)? else {
                    continue;
                };
                let Some(amount) = prompt_decimal(input, "Enter the new price (RM): ")? else {
                    continue;
                };
                match desk.set_price(&zone, bracket, amount) {
                    Ok(()) => println!(
                        "✓ Price for {zone} ({}) set to {}",
                        bracket.label(),
                        render::money(amount)
                    ),
                    Err(err) => println!("{err}"),
                }
            }
            "8" => {
                let zone = prompt(input, "Enter the zone to delete pricing for: ")?;
                match desk.clear_price(&zone) {
                    Ok(true) => println!("✓ Pricing cleared for {zone}"),
                    Ok(false) => println!("Zone {zone} not found."),
                    Err(err) => println!("{err}"),
                }
            }
            "9" => run_check_price(desk, input)?,
            "10" => {
                let confirm = prompt(
                    input,
                    "This clears every parcel and bill and rewinds the number sequences. \
                     Type 'yes' to confirm: ",
                )?;
                if confirm.eq_ignore_ascii_case("yes") {
                    match desk.reset_parcels_and_bills() {
                        Ok(()) => println!("✓ Parcels and bills cleared"),
                        Err(err) => println!("{err}"),
                    }
                } else {
                    println!("Reset cancelled.");
                }
            }
            "11" => {
                if desk.customers().is_empty() {
                    println!("No customers available.");
                    continue;
                }
                println!("{}", render::customers_table(&desk.customers().list()));
                let Some(id) = prompt_u64(input, "Enter the customer ID to delete: ")? else {
                    continue;
                };
                match desk.remove_customer(id) {
                    Ok(dropped) => println!("✓ Customer {} (ID {id}) removed", dropped.name),
                    Err(err) => println!("{err}"),
                }
            }
            "12" => {
                desk.save_all().context("saving collections")?;
                println!("✓ Collections saved");
                println!("Logging out...");
                return Ok(());
            }
            _ => println!("Invalid option!"),
        }
    }
}

// ============================================================================
// SHARED FLOWS
// ============================================================================

fn run_view_bill(desk: &Desk, consignment: &str) {
    match desk.consignment_status(consignment) {
        Ok(status) => {
            println!("Status: {}", status.label());
            if status == ConsignmentStatus::Empty {
                println!("Every parcel in consignment {consignment} has been deleted.");
            } else {
                match desk.view_bill(consignment) {
                    Ok(bill) => println!("{}", render::bill_sheet(&bill)),
                    Err(err) => println!("{err}"),
                }
            }
        }
        Err(err) => println!("{err}"),
    }
}

fn run_check_price(desk: &Desk, input: &mut impl BufRead) -> Result<()> {
    let zone = prompt(input, "Enter the destination zone: ")?;
    let Some(weight) = prompt_decimal(input, "Enter the weight of the parcel (kg): ")? else {
        return Ok(());
    };
    match desk.check_price(&zone, weight) {
        Some(price) => println!(
            "The price for a parcel to {zone} weighing {weight}kg is {}",
            render::money(price)
        ),
        None => println!("Invalid destination or weight for pricing."),
    }
    Ok(())
}

// ============================================================================
// PROMPT HELPERS
// ============================================================================

fn prompt(input: &mut impl BufRead, message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("input stream closed");
    }
    Ok(line.trim().to_string())
}

fn prompt_u64(input: &mut impl BufRead, message: &str) -> Result<Option<u64>> {
    let raw = prompt(input, message)?;
    match raw.parse::<u64>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            println!("Invalid input. Please enter a valid number.");
            Ok(None)
        }
    }
}

fn prompt_decimal(input: &mut impl BufRead, message: &str) -> Result<Option<Decimal>> {
    let raw = prompt(input, message)?;
    match raw.parse::<Decimal>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            println!("Invalid input. Please enter a valid number.");
            Ok(None)
        }
    }
}

fn prompt_date(input: &mut impl BufRead, message: &str) -> Result<Option<NaiveDate>> {
    let raw = prompt(input, message)?;
    match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            println!("Invalid date. Please use the YYYY-MM-DD format.");
            Ok(None)
        }
    }
}

fn prompt_sender(input: &mut impl BufRead) -> Result<SenderInfo> {
    let name = prompt(input, "Enter sender's name: ")?;
    let address = prompt(input, "Enter sender's address: ")?;
    let telephone = prompt(input, "Enter sender's telephone: ")?;
    Ok(SenderInfo::new(&name, &address, &telephone))
}

fn prompt_bracket(input: &mut impl BufRead) -> Result<Option<WeightBracket>> {
    let raw = prompt(
        input,
        "Enter the weight bracket (1 = below 1kg, 2 = 1kg to 3kg, 3 = above 3kg): ",
    )?;
    let bracket = match raw.as_str() {
        "1" => WeightBracket::Below1Kg,
        "2" => WeightBracket::OneToThreeKg,
        "3" => WeightBracket::AboveThreeKg,
        _ => {
            println!("Invalid bracket option!");
            return Ok(None);
        }
    };
    Ok(Some(bracket))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
