//! Step-by-step construction through a director.
//!
//! # Invariants
//! - A director always runs the same step sequence; builders decide only the
//!   content of each step.
//! - `build` hands over the finished product and leaves the builder ready
//!   for another run.

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub report_type: String,
    pub header: String,
    pub content: String,
    pub footer: String,
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Report Type :{}", self.report_type)?;
        writeln!(f, "Header :{}", self.header)?;
        writeln!(f, "Content :{}", self.content)?;
        write!(f, "Footer :{}", self.footer)
    }
}

pub trait ReportBuilder {
    fn report_mut(&mut self) -> &mut Report;
    fn take_report(&mut self) -> Report;

    fn set_report_type(&mut self);
    fn set_header(&mut self);
    fn set_content(&mut self);
    fn set_footer(&mut self);
}

#[derive(Debug, Default)]
pub struct PdfReport {
    report: Report,
}

#[derive(Debug, Default)]
pub struct ExcelReport {
    report: Report,
}

macro_rules! report_builder {
    ($builder:ty, $kind:literal) => {
        impl ReportBuilder for $builder {
            fn report_mut(&mut self) -> &mut Report {
                &mut self.report
            }

            fn take_report(&mut self) -> Report {
                std::mem::take(&mut self.report)
            }

            fn set_report_type(&mut self) {
                self.report.report_type = $kind.to_string();
            }

            fn set_header(&mut self) {
                self.report.header = concat!($kind, " Header").to_string();
            }

            fn set_content(&mut self) {
                self.report.content = concat!($kind, " Content Section").to_string();
            }

            fn set_footer(&mut self) {
                self.report.footer = concat!($kind, " Footer").to_string();
            }
        }
    };
}

report_builder!(PdfReport, "PDF");
report_builder!(ExcelReport, "Excel");

#[derive(Debug, Default)]
pub struct ReportDirector;

impl ReportDirector {
    pub fn make_report(&self, builder: &mut impl ReportBuilder) -> Report {
        *builder.report_mut() = Report::default();
        builder.set_report_type();
        builder.set_header();
        builder.set_content();
        builder.set_footer();
        builder.take_report()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Beverage {
    pub name: String,
    pub water_ml: u32,
    pub milk_ml: u32,
    pub sugar_gm: u32,
    pub powder_gm: u32,
    /// Preparation steps in the order the builder ran them.
    pub steps: Vec<String>,
}

impl Display for Beverage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Hot {} [{} ml of water, {}ml of milk, {} gm of sugar, {} gm of {}]",
            self.name, self.water_ml, self.milk_ml, self.sugar_gm, self.powder_gm, self.name
        )
    }
}

/// Fixed recipe quantities for one beverage kind.
#[derive(Debug, Clone, Copy)]
struct Recipe {
    name: &'static str,
    water_ml: u32,
    milk_ml: u32,
    sugar_gm: u32,
    powder_gm: u32,
    powder: &'static str,
}

pub trait BeverageBuilder {
    fn reset(&mut self);
    fn take_beverage(&mut self) -> Beverage;

    fn set_beverage_type(&mut self);
    fn set_water(&mut self);
    fn set_milk(&mut self);
    fn set_sugar(&mut self);
    fn set_powder_quantity(&mut self);
}

#[derive(Debug)]
struct RecipeBuilder {
    recipe: Recipe,
    beverage: Beverage,
}

impl RecipeBuilder {
    fn new(recipe: Recipe) -> Self {
        Self {
            recipe,
            beverage: Beverage::default(),
        }
    }

    fn step(&mut self, text: String) {
        self.beverage.steps.push(text);
    }
}

impl BeverageBuilder for RecipeBuilder {
    fn reset(&mut self) {
        self.beverage = Beverage::default();
    }

    fn take_beverage(&mut self) -> Beverage {
        std::mem::take(&mut self.beverage)
    }

    fn set_beverage_type(&mut self) {
        self.beverage.name = self.recipe.name.to_string();
        self.step(self.recipe.name.to_string());
    }

    fn set_water(&mut self) {
        self.beverage.water_ml = self.recipe.water_ml;
        self.step("Step 1 : Boiling water".to_string());
    }

    fn set_milk(&mut self) {
        self.beverage.milk_ml = self.recipe.milk_ml;
        self.step("Step 2 : Adding milk".to_string());
    }

    fn set_sugar(&mut self) {
        self.beverage.sugar_gm = self.recipe.sugar_gm;
        self.step("Step 3 : Adding Sugar".to_string());
    }

    fn set_powder_quantity(&mut self) {
        self.beverage.powder_gm = self.recipe.powder_gm;
        let text = format!(
            "Step 4 : Adding {} Grams of {} powder",
            self.recipe.powder_gm, self.recipe.powder
        );
        self.step(text);
    }
}

macro_rules! recipe_builder {
    ($builder:ident, $recipe:expr) => {
        #[derive(Debug)]
        pub struct $builder(RecipeBuilder);

        impl Default for $builder {
            fn default() -> Self {
                Self(RecipeBuilder::new($recipe))
            }
        }

        impl BeverageBuilder for $builder {
            fn reset(&mut self) {
                self.0.reset()
            }

            fn take_beverage(&mut self) -> Beverage {
                self.0.take_beverage()
            }

            fn set_beverage_type(&mut self) {
                self.0.set_beverage_type()
            }

            fn set_water(&mut self) {
                self.0.set_water()
            }

            fn set_milk(&mut self) {
                self.0.set_milk()
            }

            fn set_sugar(&mut self) {
                self.0.set_sugar()
            }

            fn set_powder_quantity(&mut self) {
                self.0.set_powder_quantity()
            }
        }
    };
}

recipe_builder!(
    TeaBuilder,
    Recipe {
        name: "Tea",
        water_ml: 50,
        milk_ml: 60,
        sugar_gm: 15,
        powder_gm: 20,
        powder: "tea",
    }
);

recipe_builder!(
    CoffeeBuilder,
    Recipe {
        name: "Coffee",
        water_ml: 40,
        milk_ml: 50,
        sugar_gm: 10,
        powder_gm: 15,
        powder: "coffee",
    }
);

#[derive(Debug, Default)]
pub struct BeverageDirector;

impl BeverageDirector {
    pub fn make_beverage(&self, builder: &mut impl BeverageBuilder) -> Beverage {
        builder.reset();
        builder.set_beverage_type();
        builder.set_water();
        builder.set_milk();
        builder.set_sugar();
        builder.set_powder_quantity();
        builder.take_beverage()
    }
}
