use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chrono::Utc;
use habit_tracker::models::{Habit, HabitRecord};
use habit_tracker::services::project;

fn make_habits(count: usize) -> Vec<Habit> {
    (0..count)
        .map(|i| Habit {
            goal: if i % 3 == 0 { None } else { Some((i % 4 + 1) as u32) },
            ..Habit::new(format!("Habit {}", i))
        })
        .collect()
}

fn make_records(habits: &[Habit], per_habit: usize) -> Vec<HabitRecord> {
    let now = Utc::now();
    habits
        .iter()
        .flat_map(|habit| {
            (0..per_habit).map(move |_| HabitRecord {
                id: uuid::Uuid::new_v4().to_string(),
                habit_id: habit.id.clone(),
                created_at: now,
                completed_at: now,
                details: Vec::new(),
            })
        })
        .collect()
}

fn benchmark_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");

    // Typical personal scale: a few dozen habits.
    let small_habits = make_habits(30);
    let small_records = make_records(&small_habits, 2);
    group.bench_function("thirty_habits", |b| {
        b.iter(|| project(black_box(&small_habits), black_box(&small_records)))
    });

    // Well past any realistic data set.
    let large_habits = make_habits(500);
    let large_records = make_records(&large_habits, 3);
    group.bench_function("five_hundred_habits", |b| {
        b.iter(|| project(black_box(&large_habits), black_box(&large_records)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_project);
criterion_main!(benches);
