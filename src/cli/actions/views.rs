use crate::finflow::View;

fn table() -> String {
    View::ALL
        .iter()
        .map(|view| format!("{:<12}{}", view.path(), view.title()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prints the sidebar navigation, in order.
pub fn execute() {
    println!("{}", table());
}
