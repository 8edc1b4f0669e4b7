use patternkit_core::patterns::adapter::{EmployeeAdapter, SalaryProcessor};
use patternkit_core::patterns::builder::{BeverageDirector, CoffeeBuilder, PdfReport, ReportDirector};
use patternkit_core::patterns::factory::{
    card_for, credit_card_factory, CardKind, CreditCard, CreditCardFactory, MoneyBackFactory,
    PlatinumFactory, TitaniumFactory,
};
use patternkit_core::patterns::injection::{
    ConstructorInjected, EmployeeDirectory, SetterInjected, StaticEmployeeDirectory,
};
use patternkit_core::patterns::prototype::{Address, DeepEmployee, ShallowEmployee};
use patternkit_core::patterns::singleton::CompositionRoot;
use patternkit_core::patterns::{AdapterError, InjectionError};
use std::rc::Rc;

fn limits(card: &dyn CreditCard) -> (&'static str, u32, u32) {
    (card.card_type(), card.credit_limit(), card.annual_charge())
}

#[test]
fn every_creation_path_yields_the_same_card_values() {
    let expected = [
        ("MoneyBack", 15_000, 500),
        ("Titanium Edge", 25_000, 1_500),
        ("Platinum Plus", 35_000, 2_000),
    ];
    let factories: [&dyn CreditCardFactory; 3] = [&MoneyBackFactory, &TitaniumFactory, &PlatinumFactory];

    for ((kind, factory), expected) in CardKind::ALL.into_iter().zip(factories).zip(expected) {
        let simple = credit_card_factory(kind.as_str()).unwrap();
        assert_eq!(limits(simple.as_ref()), expected);
        assert_eq!(limits(card_for(kind).as_ref()), expected);
        assert_eq!(limits(factory.create_product().as_ref()), expected);
    }
}

#[test]
fn coffee_recipe_matches_quantities() {
    let coffee = BeverageDirector.make_beverage(&mut CoffeeBuilder::default());
    assert_eq!(
        coffee.to_string(),
        "Hot Coffee [40 ml of water, 50ml of milk, 10 gm of sugar, 15 gm of Coffee]"
    );
    assert_eq!(coffee.steps[0], "Coffee");

    let report = ReportDirector.make_report(&mut PdfReport::default());
    assert_eq!(report.footer, "PDF Footer");
}

#[test]
fn clone_contracts_differ_only_in_address_sharing() {
    let shallow = ShallowEmployee::new("Anurag", "IT", Address::new("BBSR"));
    let shallow_copy = shallow.shallow_clone();
    assert!(Rc::ptr_eq(&shallow.address, &shallow_copy.address));

    let deep = DeepEmployee::new("Anurag", "IT", Address::new("BBSR"));
    let deep_copy = deep.deep_clone();
    assert!(!Rc::ptr_eq(&deep.address, &deep_copy.address));
    assert_eq!(*deep.address.borrow(), *deep_copy.address.borrow());
}

#[test]
fn adapter_rejects_unparseable_salary() {
    let rows: [&[&str]; 1] = [&["101", "John", "SE", "ten thousand"]];
    assert!(matches!(
        EmployeeAdapter::default().process_company_salary(&rows),
        Err(AdapterError::InvalidSalary { row: 0, .. })
    ));
}

#[test]
fn injected_directory_is_replaceable_at_runtime() {
    let mut client = SetterInjected::new();
    assert!(matches!(
        client.all_employees(),
        Err(InjectionError::NotInitialized(_))
    ));

    client.set_directory(Box::new(StaticEmployeeDirectory));
    assert_eq!(
        client.all_employees().unwrap(),
        ConstructorInjected::new(StaticEmployeeDirectory).all_employees()
    );
    assert_eq!(StaticEmployeeDirectory.select_all_employees()[0].name, "Pranaya");
}

#[test]
fn composition_root_counts_constructions_not_handles() {
    let root = CompositionRoot::new();
    let handles = (0..5).map(|_| root.spooler()).collect::<Vec<_>>();
    assert_eq!(root.instances_created(), 1);
    assert_eq!(Rc::strong_count(&handles[0]), 6);
}
