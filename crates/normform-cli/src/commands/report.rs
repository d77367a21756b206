//! Human-readable rendering shared by the commands.

use colored::{ColoredString, Colorize};
use normform::{AnalysisResult, FunctionalDependency, NormalForm};

/// "Yes" in green or "No" in red.
pub fn yes_no(value: bool) -> ColoredString {
    if value { "Yes".green() } else { "No".red() }
}

/// Print the verdict block for one analysis.
pub fn print_analysis(result: &AnalysisResult, show_violations: bool) {
    let forms = &result.normal_forms;

    println!(
        "{} {} {}",
        "Dataset".cyan().bold(),
        result.dataset.white(),
        format!("(key {})", result.primary_key).dimmed()
    );
    println!(
        "  {} rows, {} attributes, {} determinants tested",
        result.summary.row_count,
        result.summary.attribute_count,
        result.summary.candidate_count
    );
    println!(
        "  Found {} functional dependencies",
        result.summary.dependency_count.to_string().white().bold()
    );
    println!("  1NF: {}", yes_no(forms.is_1nf));
    println!("  2NF: {}", yes_no(forms.is_2nf));
    println!("  3NF: {}", yes_no(forms.is_3nf));
    println!("  Highest normal form: {}", highest(result.summary.highest_normal_form));

    if show_violations {
        print_violations(
            "Partial dependencies (violate 2NF)",
            &forms.partial_dependencies,
        );
        print_violations(
            "Transitive dependencies (violate 3NF)",
            &forms.transitive_dependencies,
        );
    }
}

/// Print a titled dependency list, or nothing when it is empty.
pub fn print_violations(title: &str, dependencies: &[FunctionalDependency]) {
    if dependencies.is_empty() {
        return;
    }
    println!();
    println!("  {}", format!("{}:", title).yellow().bold());
    for fd in dependencies {
        println!("    {}", fd);
    }
}

fn highest(form: Option<NormalForm>) -> ColoredString {
    match form {
        Some(NormalForm::Third) => "3NF".green().bold(),
        Some(form) => form.to_string().yellow().bold(),
        None => "none".red().bold(),
    }
}
