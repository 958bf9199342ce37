// 🖨️ Render - Grid tables and currency formatting
// The only module that turns core values into display text. Everything is
// returned as a String so the shell decides where it goes.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::billing::{Bill, Statement};
use crate::customers::Customer;
use crate::ledger::Parcel;
use crate::pricing::PricingTable;
use crate::users::User;

/// Currency prefix used on every printed amount.
const CURRENCY: &str = "RM";

/// Marker for a tariff bracket with no price set.
const UNSET: &str = "-";

pub fn money(amount: Decimal) -> String {
    format!("{CURRENCY}{amount:.2}")
}

pub fn date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// Bordered grid table: fitted column widths, `=` rule under the header,
/// `-` rules everywhere else.
pub fn grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = String::new();
    push_rule(&mut out, &widths, '-');
    push_row(&mut out, &widths, &header_cells);
    push_rule(&mut out, &widths, '=');
    for row in rows {
        push_row(&mut out, &widths, row);
        push_rule(&mut out, &widths, '-');
    }
    out
}

pub fn customers_table(customers: &[Customer]) -> String {
    let rows: Vec<Vec<String>> = customers
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.name.clone(),
                c.address.clone(),
                c.telephone.clone(),
            ]
        })
        .collect();
    grid(&["ID", "Name", "Address", "Telephone"], &rows)
}

pub fn parcels_table(parcels: &[Parcel]) -> String {
    let rows: Vec<Vec<String>> = parcels
        .iter()
        .map(|p| {
            vec![
                p.consignment_number.clone(),
                p.parcel_number.clone(),
                p.customer_id.to_string(),
                p.destination.clone(),
                p.weight.to_string(),
                p.sender_name.clone(),
                p.sender_address.clone(),
                p.sender_telephone.clone(),
                money(p.price),
                date(p.date),
            ]
        })
        .collect();
    grid(
        &[
            "Consignment Number",
            "Parcel Number",
            "Customer ID",
            "Destination",
            "Weight",
            "Sender Name",
            "Sender Address",
            "Sender Telephone",
            "Price",
            "Date",
        ],
        &rows,
    )
}

pub fn pricing_table(table: &PricingTable) -> String {
    let rows: Vec<Vec<String>> = table
        .rates()
        .iter()
        .map(|r| {
            vec![
                r.zone.clone(),
                bracket_cell(r.below_1kg),
                bracket_cell(r.one_to_3kg),
                bracket_cell(r.above_3kg),
            ]
        })
        .collect();
    grid(&["Destination", "Below 1kg", "1-3kg", "Above 3kg"], &rows)
}

pub fn users_table(users: &[User]) -> String {
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| vec![u.username.clone(), u.role.label().to_string()])
        .collect();
    grid(&["Username", "Role"], &rows)
}

/// Full bill sheet: consignment header, customer block, line items, totals.
pub fn bill_sheet(bill: &Bill) -> String {
    let header = format!(
        "Consignment: {}    Date: {}\nCustomer: {}\nAddress: {}\nTelephone: {}\n",
        bill.consignment_number,
        date(bill.date),
        bill.customer_name.as_deref().unwrap_or(UNSET),
        bill.customer_address.as_deref().unwrap_or(UNSET),
        bill.customer_telephone.as_deref().unwrap_or(UNSET),
    );

    let rows: Vec<Vec<String>> = bill
        .items
        .iter()
        .map(|item| {
            vec![
                item.parcel_number.clone(),
                item.receiver_name.clone(),
                item.receiver_address.clone(),
                item.receiver_telephone.clone(),
                item.destination.clone(),
                item.weight.to_string(),
                money(item.price),
            ]
        })
        .collect();
    let items = grid(
        &[
            "Parcel Number",
            "Receiver Name",
            "Receiver Address",
            "Receiver Telephone",
            "Destination",
            "Weight",
            "Price",
        ],
        &rows,
    );

    format!(
        "{header}{items}{}",
        totals_block(bill.subtotal, bill.service_tax, bill.total_with_tax)
    )
}

/// Statement rows with the full receiver block, for the per-customer view.
pub fn customer_statement(statement: &Statement) -> String {
    let rows: Vec<Vec<String>> = statement
        .rows
        .iter()
        .map(|r| {
            vec![
                r.consignment_number.clone(),
                r.parcel_number.clone(),
                r.receiver_name.clone(),
                r.receiver_address.clone(),
                r.receiver_telephone.clone(),
                r.destination.clone(),
                r.weight.to_string(),
                money(r.price),
            ]
        })
        .collect();
    let table = grid(
        &[
            "Consignment Number",
            "Parcel Number",
            "Receiver Name",
            "Receiver Address",
            "Receiver Telephone",
            "Destination",
            "Weight (KG)",
            "Price (RM)",
        ],
        &rows,
    );
    format!(
        "{table}{}",
        totals_block(statement.subtotal, statement.service_tax, statement.total_with_tax)
    )
}

/// Slimmer statement layout used for the date-range view.
pub fn date_statement(statement: &Statement) -> String {
    let rows: Vec<Vec<String>> = statement
        .rows
        .iter()
        .map(|r| {
            vec![
                r.consignment_number.clone(),
                r.parcel_number.clone(),
                r.destination.clone(),
                r.weight.to_string(),
                money(r.price),
            ]
        })
        .collect();
    let table = grid(
        &[
            "Consignment Number",
            "Parcel Number",
            "Destination",
            "Weight",
            "Price",
        ],
        &rows,
    );
    format!(
        "{table}{}",
        totals_block(statement.subtotal, statement.service_tax, statement.total_with_tax)
    )
}

fn totals_block(subtotal: Decimal, service_tax: Decimal, total_with_tax: Decimal) -> String {
    format!(
        "Total Amount: {}\nService Tax (8%): {}\nTotal Amount with Tax: {}\n",
        money(subtotal),
        money(service_tax),
        money(total_with_tax),
    )
}

fn bracket_cell(price: Option<Decimal>) -> String {
    price.map(money).unwrap_or_else(|| UNSET.to_string())
}

fn push_rule(out: &mut String, widths: &[usize], fill: char) {
    out.push('+');
    for w in widths {
        for _ in 0..w + 2 {
            out.push(fill);
        }
        out.push('+');
    }
    out.push('\n');
}

fn push_row(out: &mut String, widths: &[usize], cells: &[String]) {
    out.push('|');
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        out.push(' ');
        out.push_str(cell);
        for _ in 0..w.saturating_sub(cell.chars().count()) {
            out.push(' ');
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_pads_to_two_places() {
        assert_eq!(money(dec!(8)), "RM8.00");
        assert_eq!(money(dec!(17.28)), "RM17.28");
    }

    #[test]
    fn test_grid_layout() {
        let out = grid(
            &["Zone", "Price"],
            &[vec!["Zone A".to_string(), "RM8.00".to_string()]],
        );
        let expected = "\
+--------+--------+
| Zone   | Price  |
+========+========+
| Zone A | RM8.00 |
+--------+--------+
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_grid_with_no_rows_still_shows_headers() {
        let out = grid(&["A"], &[]);
        assert!(out.contains("| A |"));
        assert!(out.ends_with("+===+\n"));
    }

    #[test]
    fn test_pricing_table_marks_unset_brackets() {
        let mut table = PricingTable::with_defaults();
        table.clear_price("Zone E");
        let out = pricing_table(&table);
        assert!(out.contains("Zone A"));
        assert!(out.contains("RM8.00"));
        assert!(out.contains("| Zone E | -"));
    }

    #[test]
    fn test_totals_block_wording() {
        let out = totals_block(dec!(16.00), dec!(1.28), dec!(17.28));
        assert_eq!(
            out,
            "Total Amount: RM16.00\nService Tax (8%): RM1.28\nTotal Amount with Tax: RM17.28\n"
        );
    }

    #[test]
    fn test_users_table_hides_passwords() {
        use crate::users::{Role, User};
        let out = users_table(&[User {
            username: "admin".to_string(),
            password: "secret".to_string(),
            role: Role::Administrator,
        }]);
        assert!(out.contains("admin"));
        assert!(out.contains("administrator"));
        assert!(!out.contains("secret"));
    }
}
