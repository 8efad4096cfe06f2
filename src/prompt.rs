//! Interactive keyword selection for `scrape` when no `--keyword` is given.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use tracing::info;

pub struct Preset {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

pub static PRESETS: &[Preset] = &[
    Preset {
        label: "วิศวกรรมปัญญาประดิษฐ์",
        keywords: &["วิศวกรรมปัญญาประดิษฐ์"],
    },
    Preset {
        label: "วิศวกรรมคอมพิวเตอร์",
        keywords: &["วิศวกรรมคอมพิวเตอร์"],
    },
    Preset {
        label: "วิศวกรรมซอฟต์แวร์",
        keywords: &["วิศวกรรมซอฟต์แวร์"],
    },
    Preset {
        label: "วิทยาการคอมพิวเตอร์",
        keywords: &["วิทยาการคอมพิวเตอร์"],
    },
    Preset {
        label: "ทั้งหมดข้างต้น",
        keywords: &[
            "วิศวกรรมปัญญาประดิษฐ์",
            "วิศวกรรมคอมพิวเตอร์",
            "วิศวกรรมซอฟต์แวร์",
            "วิทยาการคอมพิวเตอร์",
        ],
    },
];

/// What the user picked from the menu.
#[derive(Debug, PartialEq, Eq)]
pub enum Choice {
    Keywords(Vec<String>),
    /// The "type your own" entry; a second line follows.
    Custom,
    Invalid,
}

/// Menu number of the free-text entry.
pub fn custom_index() -> usize {
    PRESETS.len() + 1
}

pub fn menu() -> String {
    let mut out = String::from("เลือกคำค้นหา:\n");
    for (i, p) in PRESETS.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, p.label));
    }
    out.push_str(&format!(
        "  {}. พิมพ์คำค้นหาเอง (คั่นด้วยเครื่องหมายจุลภาค)\n",
        custom_index()
    ));
    out
}

/// Interpret one menu answer. Anything that is not a number is taken as
/// free-text keywords directly.
pub fn parse_choice(input: &str) -> Choice {
    let input = input.trim();
    if input.is_empty() {
        return Choice::Invalid;
    }
    match input.parse::<usize>() {
        Ok(n) if n == custom_index() => Choice::Custom,
        Ok(n) if (1..=PRESETS.len()).contains(&n) => Choice::Keywords(
            PRESETS[n - 1].keywords.iter().map(|k| k.to_string()).collect(),
        ),
        Ok(_) => Choice::Invalid,
        Err(_) => match split_keywords(input) {
            k if k.is_empty() => Choice::Invalid,
            k => Choice::Keywords(k),
        },
    }
}

/// "AI, วิศวกรรมคอมพิวเตอร์ ,," → ["AI", "วิศวกรรมคอมพิวเตอร์"]
pub fn split_keywords(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run the menu on `input`/`output` until a valid choice is made.
/// `None` means end of input.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Option<Vec<String>>> {
    loop {
        write!(output, "{}> ", menu())?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };

        match parse_choice(&line) {
            Choice::Keywords(k) => return Ok(Some(k)),
            Choice::Custom => {
                write!(output, "คำค้นหา: ")?;
                output.flush()?;
                let Some(line) = read_line(input)? else {
                    return Ok(None);
                };
                let k = split_keywords(&line);
                if !k.is_empty() {
                    return Ok(Some(k));
                }
            }
            Choice::Invalid => {}
        }
        writeln!(output, "ตัวเลือกไม่ถูกต้อง ลองอีกครั้ง")?;
    }
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let n = input.read_line(&mut line).context("Failed to read stdin")?;
    Ok(if n == 0 { None } else { Some(line) })
}

/// Prompt on the terminal. Ctrl-C or end of input returns `None`.
pub async fn prompt_keywords() -> Result<Option<Vec<String>>> {
    let blocking = tokio::task::spawn_blocking(|| {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        ask(&mut input, &mut io::stdout())
    });

    tokio::select! {
        res = blocking => res.context("Prompt task failed")?,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, nothing scraped");
            Ok(None)
        }
    }
}
