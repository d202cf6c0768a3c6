//! Interactive question loop for `ask chat`.
//!
//! Prints the banner and sample questions, then answers one question per
//! input line until end of input. Failed answers print as `A: ` with the
//! error going to the log.

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::answer::AnswerGenerator;

pub const BANNER: &str = r#"
██████╗░███████╗██╗░░░░░░█████╗░██╗████████╗████████╗███████╗
██╔══██╗██╔════╝██║░░░░░██╔══██╗██║╚══██╔══╝╚══██╔══╝██╔════╝
██║░░██║█████╗░░██║░░░░░██║░░██║██║░░░██║░░░░░░██║░░░█████╗░░
██║░░██║██╔══╝░░██║░░░░░██║░░██║██║░░░██║░░░░░░██║░░░██╔══╝░░
██████╔╝███████╗███████╗╚█████╔╝██║░░░██║░░░░░░██║░░░███████╗
╚═════╝░╚══════╝╚══════╝░╚════╝░╚═╝░░░╚═╝░░░░░░╚═╝░░░╚══════╝

██╗░░██╗███╗░░██╗░█████╗░░██╗░░░░░░░██╗██╗░░░░░███████╗██████╗░░██████╗░███████╗  ██████╗░░█████╗░░██████╗███████╗
██║░██╔╝████╗░██║██╔══██╗░██║░░██╗░░██║██║░░░░░██╔════╝██╔══██╗██╔════╝░██╔════╝  ██╔══██╗██╔══██╗██╔════╝██╔════╝
█████═╝░██╔██╗██║██║░░██║░╚██╗████╗██╔╝██║░░░░░█████╗░░██║░░██║██║░░██╗░█████╗░░  ██████╦╝███████║╚█████╗░█████╗░░
██╔═██╗░██║╚████║██║░░██║░░████╔═████║░██║░░░░░██╔══╝░░██║░░██║██║░░╚██╗██╔══╝░░  ██╔══██╗██╔══██║░╚═══██╗██╔══╝░░
██║░╚██╗██║░╚███║╚█████╔╝░░╚██╔╝░╚██╔╝░███████╗███████╗██████╔╝╚██████╔╝███████╗  ██████╦╝██║░░██║██████╔╝███████╗
╚═╝░░╚═╝╚═╝░░╚══╝░╚════╝░░░░╚═╝░░░╚═╝░░╚══════╝╚══════╝╚═════╝░░╚═════╝░╚══════╝  ╚═════╝░╚═╝░░╚═╝╚═════╝░╚══════╝
"#;

pub const SIMPLE_QUESTIONS: [&str; 4] = [
    "Who is the partner in Deloitte legal?",
    "Who is the partner for consulting in Deloitte?",
    "Who is the partner in the Regulatory & Compliance department at Deloitte Legal in Prague?",
    "Who is the partner for Tax & Legal?",
];

pub const MORE_COMPLEX_QUESTIONS: [&str; 6] = [
    "Name three partners in Deloitte.",
    "What is Jaroslava Kračúnová's role at Deloitte Legal?",
    "Who is responsible for M&A and delivery of financial due diligence services and what is his role?",
    "Who are the partners for consulting?",
    "Who should I contact regarding M&A?",
    "Who worked for Deloitte in New York and when?",
];

const PROMPT: &str = "Ask me any question... \nQ: ";

/// Print the banner and both sample question lists.
pub fn print_intro<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{}", BANNER)?;
    writeln!(out, "SAMPLE QUESTIONS \n")?;

    writeln!(out, "    SIMPLE QUESTIONS:")?;
    for q in SIMPLE_QUESTIONS {
        writeln!(out, "     -  {}", q)?;
    }
    writeln!(out)?;

    writeln!(out, "    MORE COMPLEX QUESTIONS:")?;
    for q in MORE_COMPLEX_QUESTIONS {
        writeln!(out, "     -  {}", q)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Run the question loop until `input` is exhausted.
///
/// Every line is sent as a question, blank ones included. Returns the
/// number of questions answered.
pub async fn run_chat<R: BufRead, W: Write>(
    generator: &AnswerGenerator,
    mut input: R,
    out: &mut W,
) -> Result<usize> {
    print_intro(out)?;

    let mut asked = 0;
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        let question = line.trim_end_matches(['\r', '\n']);

        let answer = generator.answer_or_empty(question).await;
        writeln!(out, "A: {}", answer)?;
        writeln!(out)?;
        asked += 1;
    }

    Ok(asked)
}
