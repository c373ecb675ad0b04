use super::commands::{
    handle_backup, handle_feedback, handle_inventory, handle_report, handle_sales, handle_search,
    handle_sell, handle_stock,
};
use super::print::prompt;
use colored::Colorize;
use std::io::BufRead;
use streetvend::api::VendorApi;
use streetvend::error::Result;

const MENU: &str = "\n===== STREET FOOD VENDOR MANAGEMENT SYSTEM =====
1. View Inventory
2. Update Inventory Item
3. Record Sale
4. Submit Customer Feedback
5. Generate Sales Report
6. Generate Daily Report
7. Search Feedback
8. Backup Data Files
9. Exit";

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Runs the numbered menu until option 9 or end of input.
///
/// A failed operation prints `Error: ...` and returns to the menu.
pub(super) fn run_menu<R: BufRead>(api: &VendorApi, input: &mut R) -> Result<()> {
    loop {
        println!("{}", MENU);
        let Some(choice) = ask(input, "\nEnter your choice (1-9): ")? else {
            break;
        };

        match dispatch(api, input, choice.trim()) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(e) => println!("{}", format!("Error: {}", e).red()),
        }
    }
    println!("Thank you for using the Street Food Vendor Management System");
    Ok(())
}

fn dispatch<R: BufRead>(api: &VendorApi, input: &mut R, choice: &str) -> Result<Flow> {
    match choice {
        "1" => handle_inventory(api)?,
        "2" => {
            let Some([name, quantity, price]) =
                ask_all(input, ["Enter item name: ", "Enter quantity: ", "Enter price: "])?
            else {
                return Ok(Flow::Exit);
            };
            handle_stock(api, &name, &quantity, &price)?;
        }
        "3" => {
            let Some([name, quantity]) =
                ask_all(input, ["Enter item name: ", "Enter quantity sold: "])?
            else {
                return Ok(Flow::Exit);
            };
            handle_sell(api, &name, &quantity)?;
        }
        "4" => {
            let Some([customer, rating, comments]) = ask_all(
                input,
                [
                    "Enter customer name: ",
                    "Enter rating (1-5): ",
                    "Enter comments: ",
                ],
            )?
            else {
                return Ok(Flow::Exit);
            };
            handle_feedback(api, &customer, &rating, &comments)?;
        }
        "5" => handle_sales(api)?,
        "6" => {
            let Some([date]) = ask_all(input, ["Enter date (YYYY-MM-DD, blank for today): "])?
            else {
                return Ok(Flow::Exit);
            };
            handle_report(api, Some(date.as_str()))?;
        }
        "7" => {
            let Some([term]) = ask_all(input, ["Enter search term: "])? else {
                return Ok(Flow::Exit);
            };
            handle_search(api, &term)?;
        }
        "8" => handle_backup(api)?,
        "9" => return Ok(Flow::Exit),
        _ => println!("Invalid choice. Please enter a number between 1 and 9."),
    }
    Ok(Flow::Continue)
}

/// One line of input without its line ending, or `None` at end of input.
fn ask<R: BufRead>(input: &mut R, label: &str) -> Result<Option<String>> {
    prompt(label);
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn ask_all<R: BufRead, const N: usize>(
    input: &mut R,
    labels: [&str; N],
) -> Result<Option<[String; N]>> {
    let mut answers: [String; N] = std::array::from_fn(|_| String::new());
    for (answer, label) in answers.iter_mut().zip(labels) {
        match ask(input, label)? {
            Some(line) => *answer = line,
            None => return Ok(None),
        }
    }
    Ok(Some(answers))
}
