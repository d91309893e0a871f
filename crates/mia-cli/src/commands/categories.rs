//! Category listing command.

use mia_core::template::TemplateRegistry;

use crate::output;

pub fn execute() {
    output::print_categories(TemplateRegistry::global());
}
