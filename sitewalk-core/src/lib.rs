pub mod crawl;
pub mod report;

use colored::Colorize;

const BANNER: &str = r#"
     _ _                     _ _
 ___(_) |___      ____ _| | | __
/ __| | __\ \ /\ / / _` | | |/ /
\__ \ | |_ \ V  V / (_| | |   <
|___/_|\__| \_/\_/ \__,_|_|_|\_\
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "sitewalk".bright_white().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
}
