use criterion::{black_box, criterion_group, criterion_main, Criterion};

use adaptutor_core::parser::parse_quiz;

fn bench_parse_quiz(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_quiz");

    let small = generate_quiz(5);
    let medium = generate_quiz(50);
    let large = generate_quiz(500);

    // Every other block is missing its answer line.
    let noisy = {
        let mut s = String::new();
        for i in 0..50 {
            s.push_str(&format!("Q{i}: Question {i}?\nA) yes\nB) no\nC) maybe\n"));
            if i % 2 == 0 {
                s.push_str("Correct: A\n");
            }
            s.push_str("---\n");
        }
        s
    };

    group.bench_function("5_questions", |b| {
        b.iter(|| parse_quiz(black_box(&small)))
    });

    group.bench_function("50_questions", |b| {
        b.iter(|| parse_quiz(black_box(&medium)))
    });

    group.bench_function("500_questions", |b| {
        b.iter(|| parse_quiz(black_box(&large)))
    });

    group.bench_function("50_noisy", |b| {
        b.iter(|| parse_quiz(black_box(&noisy)))
    });

    group.finish();
}

fn generate_quiz(n: usize) -> String {
    let mut s = String::from("Here is your quiz:\n\n");
    for i in 1..=n {
        s.push_str(&format!(
            "Q{i}: What does concept number {i} describe?\n\
             A) The first option for {i}\n\
             B) The second option for {i}\n\
             C) The third option for {i}\n\
             D) The fourth option for {i}\n\
             Correct: {}\n\
             Explanation: Option {} is right for question {i}.\n\n---\n\n",
            ['A', 'B', 'C', 'D'][i % 4],
            ['A', 'B', 'C', 'D'][i % 4],
        ));
    }
    s
}

criterion_group!(benches, bench_parse_quiz);
criterion_main!(benches);
