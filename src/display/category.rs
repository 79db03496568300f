//! Category and company display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::engine::CategoryTree;
use crate::models::{CategoryId, Company};

/// Format the category forest with box-drawing branches
pub fn format_category_tree(tree: &CategoryTree) -> String {
    if tree.is_empty() {
        return "No categories found.".to_string();
    }

    let mut output = String::new();

    // (node, prefix of its children, branch drawn in front of it)
    let mut stack: Vec<(CategoryId, String, Option<&'static str>)> = tree
        .roots()
        .iter()
        .rev()
        .map(|id| (*id, String::new(), None))
        .collect();

    while let Some((id, prefix, branch)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };

        match branch {
            None => output.push_str(&format!("{} [{}]\n", node.category.name, node.id())),
            Some(branch) => output.push_str(&format!(
                "{}{}{} [{}]\n",
                prefix,
                branch,
                node.category.name,
                node.id()
            )),
        }

        let child_prefix = match branch {
            None => String::new(),
            Some("└── ") => format!("{}    ", prefix),
            Some(_) => format!("{}│   ", prefix),
        };

        let children = &node.children;
        for (i, child) in children.iter().enumerate().rev() {
            let is_last = i == children.len() - 1;
            let branch = if is_last { "└── " } else { "├── " };
            stack.push((*child, child_prefix.clone(), Some(branch)));
        }
    }

    if !tree.excluded().is_empty() {
        output.push_str(&format!(
            "\n{} categories excluded (see warnings)\n",
            tree.excluded().len()
        ));
    }

    output
}

#[derive(Tabled)]
struct CompanyLine {
    #[tabled(rename = "Company")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Created")]
    created: String,
}

/// Format companies as a table
pub fn format_company_list(companies: &[Company]) -> String {
    if companies.is_empty() {
        return "No companies found.\n\nRun 'treasury company add <name>' or 'treasury import <file>'."
            .to_string();
    }

    let lines: Vec<CompanyLine> = companies
        .iter()
        .map(|c| CompanyLine {
            name: c.name.clone(),
            id: c.id.as_uuid().to_string(),
            created: c.created_at.format("%Y-%m-%d").to_string(),
        })
        .collect();

    let mut table = Table::new(lines);
    table.with(Style::rounded());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Diagnostics;
    use crate::models::{Category, CompanyId};

    #[test]
    fn test_format_empty_tree() {
        let tree = CategoryTree::build(CompanyId::new(), &[], &mut Diagnostics::new());
        assert!(format_category_tree(&tree).contains("No categories found"));
    }

    #[test]
    fn test_format_category_tree() {
        let company = CompanyId::new();
        let ops = Category::new("Operations", company);
        let hosting = Category::child_of("Hosting", company, ops.id);
        let software = Category::child_of("Software", company, ops.id);
        let licences = Category::child_of("Licences", company, software.id);
        let sales = Category::new("Sales", company);

        let tree = CategoryTree::build(
            company,
            &[ops, hosting, software, licences, sales],
            &mut Diagnostics::new(),
        );
        let output = format_category_tree(&tree);
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("Operations"));
        assert!(lines[1].starts_with("├── Hosting"));
        assert!(lines[2].starts_with("└── Software"));
        assert!(lines[3].starts_with("    └── Licences"));
        assert!(lines[4].starts_with("Sales"));
    }

    #[test]
    fn test_excluded_categories_are_mentioned() {
        let company = CompanyId::new();
        let ok = Category::new("Ok", company);
        let mut selfish = Category::new("Selfish", company);
        selfish.parent_id = Some(selfish.id);

        let tree = CategoryTree::build(company, &[ok, selfish], &mut Diagnostics::new());
        let output = format_category_tree(&tree);
        assert!(output.contains("1 categories excluded"));
        assert!(!output.contains("Selfish"));
    }

    #[test]
    fn test_format_company_list() {
        assert!(format_company_list(&[]).contains("No companies found"));

        let acme = Company::new("Acme");
        let output = format_company_list(&[acme.clone()]);
        assert!(output.contains("Acme"));
        assert!(output.contains(&acme.id.as_uuid().to_string()));
    }
}
