//! `patternkit employees <db> ...`

use anyhow::{Context, Result};
use clap::Subcommand;
use patternkit_core::{DatabaseLocation, Employee, EmployeeService, SqliteEmployeeRepository};
use std::path::Path;

#[derive(Subcommand)]
pub enum Action {
    /// List every employee ordered by id.
    List {
        /// Only employees of this department.
        #[arg(short, long)]
        dept: Option<String>,
    },

    /// Add a new employee.
    Hire {
        id: i64,
        name: String,
        gender: String,
        dept: String,

        #[arg(short, long)]
        salary: Option<i64>,
    },

    /// Remove an employee by id.
    Dismiss { id: i64 },
}

pub fn run(db: &Path, action: Action) -> Result<()> {
    let repo = SqliteEmployeeRepository::open(&DatabaseLocation::File(db.to_path_buf()))
        .with_context(|| format!("failed to open `{}`", db.display()))?;
    let service = EmployeeService::new(repo);

    match action {
        Action::List { dept } => {
            let employees = match dept {
                Some(dept) => service.department_roster(&dept)?,
                None => service.list()?,
            };
            if employees.is_empty() {
                println!("no employees");
            }
            for employee in employees {
                println!("{}", format_row(&employee));
            }
        }
        Action::Hire {
            id,
            name,
            gender,
            dept,
            salary,
        } => {
            let mut employee = Employee::new(id, name, gender, dept);
            employee.set_salary(salary);
            service.hire(employee)?;
            println!("hired {id}");
        }
        Action::Dismiss { id } => {
            service.dismiss(id)?;
            println!("dismissed {id}");
        }
    }

    service.repository().dispose()?;
    Ok(())
}

fn format_row(employee: &Employee) -> String {
    let salary = employee
        .salary
        .map_or_else(|| "-".to_string(), |salary| salary.to_string());
    format!(
        "{:>4}  {:<20} {:<8} {:<12} {salary}",
        employee.employee_id, employee.name, employee.gender, employee.dept
    )
}
