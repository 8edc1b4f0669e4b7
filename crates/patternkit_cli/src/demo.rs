//! `patternkit demo <pattern>`: console walkthroughs.

use anyhow::Result;
use clap::ValueEnum;
use patternkit_core::patterns::adapter::{EmployeeAdapter, SalaryProcessor, Translator};
use patternkit_core::patterns::builder::{
    BeverageDirector, CoffeeBuilder, ExcelReport, PdfReport, ReportDirector, TeaBuilder,
};
use patternkit_core::patterns::factory::{
    credit_card_factory, CreditCard, CreditCardFactory, MoneyBackFactory, PlatinumFactory,
};
use patternkit_core::patterns::fluent::FluentEmployee;
use patternkit_core::patterns::injection::{
    ConstructorInjected, MethodInjected, SetterInjected, StaticEmployeeDirectory,
};
use patternkit_core::patterns::prototype::{Address, DeepEmployee, ShallowEmployee};
use patternkit_core::patterns::singleton::{CompositionRoot, ReportPrinter};
use patternkit_core::{
    Department, DepartmentTransfer, Employee, EmployeeRepository, Repository, UnitOfWork,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Pattern {
    Builder,
    Factory,
    FactoryMethod,
    Fluent,
    Prototype,
    Adapter,
    Injection,
    Singleton,
    Repository,
    UnitOfWork,
}

pub fn run(pattern: Pattern) -> Result<()> {
    match pattern {
        Pattern::Builder => builder(),
        Pattern::Factory => factory(),
        Pattern::FactoryMethod => factory_method(),
        Pattern::Fluent => fluent()?,
        Pattern::Prototype => prototype(),
        Pattern::Adapter => adapter()?,
        Pattern::Injection => injection()?,
        Pattern::Singleton => singleton(),
        Pattern::Repository => repository()?,
        Pattern::UnitOfWork => unit_of_work()?,
    }
    Ok(())
}

fn builder() {
    let director = ReportDirector;
    println!("{}", director.make_report(&mut PdfReport::default()));
    println!("-------------------");
    println!("{}", director.make_report(&mut ExcelReport::default()));
    println!();

    let director = BeverageDirector;
    for beverage in [
        director.make_beverage(&mut TeaBuilder::default()),
        director.make_beverage(&mut CoffeeBuilder::default()),
    ] {
        for step in &beverage.steps {
            println!("{step}");
        }
        println!("{beverage}\n");
    }
}

fn print_card(card: &dyn CreditCard) {
    println!("{}", card.describe());
}

fn factory() {
    for card_type in ["MoneyBack", "Titanium", "Platinum", "Gold"] {
        println!("------{card_type}--------");
        match credit_card_factory(card_type) {
            Some(card) => print_card(card.as_ref()),
            None => println!("Invalid Card Type"),
        }
    }
}

fn factory_method() {
    println!("------Platinum--------");
    print_card(PlatinumFactory.create_product().as_ref());
    println!("------MoneyBack--------");
    print_card(MoneyBackFactory.create_product().as_ref());
}

fn fluent() -> Result<()> {
    let profile = FluentEmployee::new()
        .name_of_the_employee("Navjyot")
        .born("05/28/1994")
        .working_on("IT")
        .stays_at("Pune-India")
        .finish()?;
    println!(
        "{} born {} works in {} and stays at {}",
        profile.full_name, profile.date_of_birth, profile.department, profile.address
    );
    Ok(())
}

fn prototype() {
    let shallow = ShallowEmployee::new("Anurag", "IT", Address::new("BBSR"));
    let mut copy = shallow.shallow_clone();
    copy.name = "Pranaya".to_string();
    copy.address.borrow_mut().line = "Mumbai".to_string();
    println!("Shallow copy");
    println!("Name: {}, Address: {}, Dept: {}", shallow.name, shallow.address_line(), shallow.department);
    println!("Name: {}, Address: {}, Dept: {}", copy.name, copy.address_line(), copy.department);

    let deep = DeepEmployee::new("Anurag", "IT", Address::new("BBSR"));
    let mut copy = deep.deep_clone();
    copy.name = "Pranaya".to_string();
    copy.address.borrow_mut().line = "Mumbai".to_string();
    println!("Deep copy");
    println!("Name: {}, Address: {}, Dept: {}", deep.name, deep.address_line(), deep.department);
    println!("Name: {}, Address: {}, Dept: {}", copy.name, copy.address_line(), copy.department);
}

fn adapter() -> Result<()> {
    let rows: [&[&str]; 5] = [
        &["101", "John", "SE", "10000"],
        &["102", "Smith", "SE", "20000"],
        &["103", "Dev", "SSE", "30000"],
        &["104", "Pam", "SE", "40000"],
        &["105", "Sara", "SSE", "50000"],
    ];
    println!("HR system passes employee rows to the adapter\n");
    for line in EmployeeAdapter::default().process_company_salary(&rows)? {
        println!("{line}");
    }

    let translator = Translator::default();
    println!();
    println!("Reply from David: {}", translator.ask_french_speaker("how are you?")?);
    println!("Reply from John: {}", translator.ask_english_speaker("où êtes-vous?")?);
    Ok(())
}

fn injection() -> Result<()> {
    let constructor = ConstructorInjected::new(StaticEmployeeDirectory);
    let mut setter = SetterInjected::new();
    setter.set_directory(Box::new(StaticEmployeeDirectory));

    println!("constructor injection: {} rows", constructor.all_employees().len());
    println!("setter injection: {} rows", setter.all_employees()?.len());
    for entry in MethodInjected.all_employees(&StaticEmployeeDirectory) {
        println!("{entry}");
    }
    Ok(())
}

fn singleton() {
    let root = CompositionRoot::new();
    ReportPrinter::new(root.spooler(), "Payroll").print();
    ReportPrinter::new(root.spooler(), "Audit").print();
    for line in root.spooler().printed() {
        println!("{line}");
    }
    println!("Counter Value {}", root.instances_created());
}

fn repository() -> Result<()> {
    let uow = UnitOfWork::open_in_memory()?;
    let employees = uow.employees()?;
    employees.insert(Employee::new(1, "Pranaya", "Male", "IT").with_salary(40_000))?;
    employees.insert(Employee::new(2, "Priyanka", "Female", "HR"))?;
    employees.insert(Employee::new(3, "Anurag", "Male", "IT"))?;
    employees.save()?;

    println!("All employees:");
    for employee in employees.get_all()? {
        println!("  {} {} ({})", employee.employee_id, employee.name, employee.dept);
    }
    println!("IT department:");
    for employee in employees.employees_by_department("IT")? {
        println!("  {}", employee.name);
    }
    println!("Female employees:");
    for employee in employees.employees_by_gender("Female")? {
        println!("  {}", employee.name);
    }
    Ok(())
}

fn unit_of_work() -> Result<()> {
    let mut uow = UnitOfWork::open_in_memory()?;
    uow.repository::<Department>()?
        .insert(Department::new(1, "IT").located_at("Pune"))?;
    let employees = uow.employees()?;
    employees.insert(Employee::new(1, "Pranaya", "Male", "IT"))?;
    employees.insert(Employee::new(2, "Anurag", "Male", "IT"))?;
    uow.save()?;

    let moved = DepartmentTransfer::new(&mut uow).rename(1, "Engineering")?;
    println!("renamed IT -> Engineering, moved {moved} employees");

    match DepartmentTransfer::new(&mut uow).rename(1, "") {
        Ok(_) => println!("unexpected success"),
        Err(err) => println!("rename rejected and rolled back:\n{err}"),
    }
    println!("transaction state: {:?}", uow.transaction_state());
    for employee in uow.employees()?.get_all()? {
        println!("  {} {} ({})", employee.employee_id, employee.name, employee.dept);
    }
    Ok(())
}
