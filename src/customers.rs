use crate::customer::Customer;
use crate::record::Schema;

/// The accepted customers, in acceptance order.
pub struct Customers {
    customers: Vec<Customer>,
    next_id: u32,
}

impl Customers {
    pub fn new() -> Self {
        Self {
            customers: Vec::new(),
            next_id: 1,
        }
    }

    /// The sequence number the next accepted customer will receive. Ids are
    /// only consumed by `accept`, so a rejected entry leaves no gap.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn accept(&mut self, customer: Customer) {
        self.next_id += 1;
        self.customers.push(customer);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Writes the customer data file: a header derived from the schema, then
    /// one row per accepted customer.
    pub fn write(&self, schema: &Schema, writer: impl std::io::Write) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(
            ["Customer Id", "Last Name", "First Name", "City"]
                .into_iter()
                .map(str::to_owned)
                .chain(schema.columns().iter().cloned())
                .chain(std::iter::once("Credit Card Number".to_owned())),
        )?;
        for customer in &self.customers {
            writer.write_record(
                [
                    customer.id().to_string(),
                    customer.last_name().to_owned(),
                    customer.first_name().to_owned(),
                    customer.city().to_owned(),
                ]
                .into_iter()
                .chain(customer.postal().values().map(str::to_owned))
                .chain(std::iter::once(customer.credit_card_number().to_owned())),
            )?;
        }
        Ok(writer.flush()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PostalCodeRegistry;

    fn accepted_customer(
        customers: &mut Customers,
        registry: &PostalCodeRegistry,
        first: &str,
        last: &str,
        city: &str,
        postal_code: &str,
        card: &str,
    ) {
        let mut customer = Customer::new(
            customers.next_id(),
            first.to_owned(),
            last.to_owned(),
            city.to_owned(),
            registry.schema(),
            postal_code.to_owned(),
            card.to_owned(),
        );
        assert!(customer.validate_postal(registry));
        assert!(customer.validate_credit_card());
        customers.accept(customer);
    }

    #[test]
    fn test_ids_are_only_consumed_on_acceptance() {
        let registry =
            PostalCodeRegistry::load("Postal Code|Place Name\nABC123|Town\n".as_bytes()).unwrap();
        let mut customers = Customers::new();
        assert_eq!(customers.next_id(), 1);

        // A rejected entry is discarded without advancing the counter.
        let mut rejected = Customer::new(
            customers.next_id(),
            "Jo".to_owned(),
            "Smith".to_owned(),
            "Nowhere".to_owned(),
            registry.schema(),
            "ZZZ999".to_owned(),
            "123456782".to_owned(),
        );
        assert!(!rejected.validate_postal(&registry));
        assert_eq!(customers.next_id(), 1);

        accepted_customer(
            &mut customers,
            &registry,
            "Jane",
            "Doe",
            "Toronto",
            "ABC999",
            "123456782",
        );
        assert_eq!(customers.next_id(), 2);
        assert_eq!(customers.len(), 1);
    }

    #[test]
    fn test_write() {
        let registry = PostalCodeRegistry::load(
            "Postal Code|Place Name|Province\nABC123|Town|ON\n".as_bytes(),
        )
        .unwrap();
        let mut customers = Customers::new();
        accepted_customer(
            &mut customers,
            &registry,
            "Jane",
            "Doe",
            "Toronto",
            "ABC999",
            "123456782",
        );
        accepted_customer(
            &mut customers,
            &registry,
            "John",
            "Roe",
            "Ottawa",
            "ABC123",
            "4111111111111111",
        );

        let mut buf = Vec::new();
        customers.write(registry.schema(), &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Customer Id,Last Name,First Name,City,Postal Code,Place Name,Province,Credit Card Number\n\
             1,Doe,Jane,Toronto,ABC999,Town,ON,123456782\n\
             2,Roe,John,Ottawa,ABC123,Town,ON,4111111111111111\n"
        );
    }
}
