use std::{process::ExitCode, time::Instant};

use skakmat_core::{board::Position, perft::perft};

#[derive(Debug, Clone)]
struct TestCase {
    fen: String,
    expected_results: Vec<u64>,
}

fn parse_test_cases() -> Vec<TestCase> {
    include_str!("perftsuite.txt")
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| {
            let (fen, results) = line.split_once(" ;").expect("suite line has results");
            let expected_results = results
                .split(" ;")
                .map(|entry| {
                    let (_, nodes) = entry.split_once(' ').expect("`Dn nodes` entry");
                    nodes.parse().expect("node count is a number")
                })
                .collect();

            TestCase {
                fen: fen.to_string(),
                expected_results,
            }
        })
        .collect()
}

fn run_test_case(id: usize, case: &TestCase) -> bool {
    println!("Test case {id}: {}", case.fen);
    let position = match Position::try_parse_fen(&case.fen) {
        Ok(position) => position,
        Err(e) => {
            println!("FEN rejected: {e}");
            return false;
        }
    };

    let mut failed = false;
    for (i, &expected) in case.expected_results.iter().enumerate() {
        let depth = i + 1;
        print!("Depth {depth}: Expected {expected}, ");
        let received = perft(&position, depth);
        print!("got {received}");

        if expected == received {
            println!();
        } else {
            failed = true;
            println!(" -- ERROR");
        }
    }

    !failed
}

fn main() -> ExitCode {
    let test_cases = parse_test_cases();
    let mut failed_cases = vec![];

    let start = Instant::now();
    for (i, case) in test_cases.iter().enumerate() {
        let id = i + 1;
        if !run_test_case(id, case) {
            failed_cases.push(id.to_string());
        }
    }
    let elapsed = start.elapsed();

    println!("Took {elapsed:?}.");

    if failed_cases.is_empty() {
        println!("All test cases passed.");
        ExitCode::SUCCESS
    } else {
        println!("Failing cases: {}", failed_cases.join(", "));
        ExitCode::FAILURE
    }
}
