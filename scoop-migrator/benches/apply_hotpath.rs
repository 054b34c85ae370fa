use criterion::{criterion_group, criterion_main, Criterion};
use scoop_core::{ColumnDefinition, ColumnOperation, Event, Migration, TableOption};
use scoop_migrator::Migrator;
use std::hint::black_box;

fn column(i: usize) -> ColumnDefinition {
    ColumnDefinition::new(
        format!("inbound_col_{i}"),
        format!("outbound_col_{i}"),
        "varchar",
        "(500)",
    )
}

fn wide_add_migration(columns: usize) -> Migration {
    Migration::add_table(
        "bench_table",
        TableOption::new(["outbound_col_0"], ["outbound_col_1"]),
        (0..columns).map(|i| ColumnOperation::add(column(i))).collect(),
    )
}

fn bench_add_table(c: &mut Criterion) {
    let migrator = Migrator::default();
    let migration = wide_add_migration(299);
    let empty = Event::new("bench_table", 1);

    c.bench_function("migrate/add_table_299_cols", |b| {
        b.iter(|| {
            let next = migrator
                .apply_migration(black_box(&migration), black_box(&empty))
                .expect("apply add");
            black_box(next.version);
        });
    });
}

fn bench_update_table(c: &mut Criterion) {
    let migrator = Migrator::default();
    let empty = Event::new("bench_table", 1);
    let table = migrator
        .apply_migration(&wide_add_migration(250), &empty)
        .expect("seed table");

    let mut ops: Vec<ColumnOperation> = (250..275).map(|i| ColumnOperation::add(column(i))).collect();
    ops.extend((100..125).map(|i| {
        ColumnOperation::update(
            format!("inbound_col_{i}"),
            format!("outbound_col_{i}"),
            ColumnDefinition::new(
                format!("inbound_col_{i}"),
                format!("outbound_col_{i}_v2"),
                "varchar",
                "(1000)",
            ),
        )
    }));
    ops.extend((200..225).map(|i| {
        ColumnOperation::remove(format!("inbound_col_{i}"), format!("outbound_col_{i}"))
    }));
    let migration = Migration::update_table("bench_table", table.table_option.clone(), ops);

    c.bench_function("migrate/update_table_75_ops", |b| {
        b.iter(|| {
            let next = migrator
                .apply_migration(black_box(&migration), black_box(&table))
                .expect("apply update");
            black_box(next.columns.len());
        });
    });
}

criterion_group!(benches, bench_add_table, bench_update_table);
criterion_main!(benches);
