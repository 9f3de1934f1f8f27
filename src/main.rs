use clap::Parser;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

mod customer;
mod customers;
mod record;
mod registry;
mod sales;

use customer::Customer;
use customers::Customers;
use registry::PostalCodeRegistry;
use sales::SalesLedger;

#[derive(Parser)]
struct Args {
    /// Postal-code reference table: `|`-delimited, header line first.
    postal_codes: PathBuf,
    /// Sales data: `id,amount` lines, header line first.
    sales: PathBuf,
}

fn main() {
    let args = Args::parse();
    let registry = PostalCodeRegistry::load(BufReader::new(
        File::open(&args.postal_codes).expect("failed to open postal-code file"),
    ))
    .expect("failed to load postal-code reference data");
    let ledger = SalesLedger::load(BufReader::new(
        File::open(&args.sales).expect("failed to open sales file"),
    ))
    .expect("failed to load sales data");
    run(
        &registry,
        &ledger,
        std::io::stdin().lock(),
        std::io::stdout(),
    )
    .expect("terminal io failed");
}

// The terminal menu. Generic over the input and output streams so the whole
// path can be driven from a scripted session in tests.
fn run(
    registry: &PostalCodeRegistry,
    ledger: &SalesLedger,
    mut input: impl BufRead,
    mut output: impl Write,
) -> std::io::Result<()> {
    if registry.skipped() > 0 {
        writeln!(
            output,
            "warning: skipped {} malformed postal-code lines",
            registry.skipped()
        )?;
    }
    if ledger.skipped() > 0 {
        writeln!(
            output,
            "warning: skipped {} malformed sales lines",
            ledger.skipped()
        )?;
    }

    let mut customers = Customers::new();
    loop {
        print_commands(&mut output)?;
        let Some(line) = read_line(&mut input)? else {
            break;
        };
        match line.trim() {
            "1" => add_customer(registry, &mut customers, &mut input, &mut output)?,
            "2" => generate_customer_file(registry, &customers, &mut input, &mut output)?,
            "3" => writeln!(output, "The total sales amount to: {}", ledger.total())?,
            "4" => match ledger.fraud_check() {
                Ok(verdict) => writeln!(output, "{verdict}")?,
                Err(e) => writeln!(output, "error: {e}")?,
            },
            "q" => break,
            _ => writeln!(output, "Please enter a valid option.")?,
        }
    }
    Ok(())
}

fn print_commands(output: &mut impl Write) -> std::io::Result<()> {
    writeln!(output, "Customer Sales Terminal:")?;
    writeln!(output, "1. Enter customer information")?;
    writeln!(output, "2. Generate customer data file")?;
    writeln!(output, "3. Report on total sales")?;
    writeln!(output, "4. Check for fraud in sales data")?;
    writeln!(output, "Enter 'q' to quit")
}

fn read_line(input: &mut impl BufRead) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
}

fn prompt(
    input: &mut impl BufRead,
    output: &mut impl Write,
    label: &str,
) -> std::io::Result<String> {
    write!(output, "{label}")?;
    output.flush()?;
    Ok(read_line(input)?.unwrap_or_default())
}

fn add_customer(
    registry: &PostalCodeRegistry,
    customers: &mut Customers,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> std::io::Result<()> {
    writeln!(output, "Adding customer to the database:")?;
    let first_name = prompt(input, output, "First name: ")?;
    let last_name = prompt(input, output, "Last name: ")?;
    let city = prompt(input, output, "City: ")?;
    let postal_code = prompt(input, output, "Postal code: ")?;
    let credit_card_number = prompt(input, output, "Credit card number: ")?;

    let mut customer = Customer::new(
        customers.next_id(),
        first_name,
        last_name,
        city,
        registry.schema(),
        postal_code,
        credit_card_number,
    );

    // Both checks run even if the first fails, so the operator sees every
    // problem with the entry at once.
    let mut ok = true;
    if !customer.validate_postal(registry) {
        writeln!(
            output,
            "Invalid postal code. Check customer info and try again."
        )?;
        ok = false;
    }
    if !customer.validate_credit_card() {
        writeln!(
            output,
            "Invalid credit card number, please enter a valid one."
        )?;
        ok = false;
    }
    if ok {
        writeln!(output, "Customer valid. Added to the database.")?;
        customers.accept(customer);
    }
    Ok(())
}

fn generate_customer_file(
    registry: &PostalCodeRegistry,
    customers: &Customers,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> std::io::Result<()> {
    let path = prompt(input, output, "Enter output file path: ")?;
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            writeln!(output, "error creating {path}: {e}")?;
            return Ok(());
        }
    };
    match customers.write(registry.schema(), file) {
        Ok(()) => writeln!(output, "File successfully written."),
        Err(e) => writeln!(output, "error writing customer file: {e}"),
    }
}
