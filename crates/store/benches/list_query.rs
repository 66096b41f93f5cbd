use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use orgdir_core::CompanyId;
use orgdir_directory::{NewCompany, NewDepartment, NewStaff};
use orgdir_store::{Directory, ListParams, SortDirection};

fn seeded_directory(staff_rows: usize) -> (Directory, CompanyId) {
    let dir = Directory::in_memory();
    let company = dir
        .create_company(NewCompany {
            name: "Bench Corp".into(),
            code: "BENCH".into(),
            address: None,
            phone: None,
            email: None,
            is_active: None,
        })
        .unwrap()
        .id;
    let department = dir
        .create_department(NewDepartment {
            company_id: company,
            name: "Engineering".into(),
            code: "ENG".into(),
            description: None,
            is_active: None,
        })
        .unwrap()
        .id;
    let role = dir
        .create_role(orgdir_directory::NewRole {
            name: "Engineer".into(),
            code: "ENGR".into(),
            description: None,
            permissions: vec![],
        })
        .unwrap()
        .id;

    for i in 0..staff_rows {
        dir.create_staff(NewStaff {
            user_id: None,
            company_id: company,
            department_id: department,
            role_id: role,
            employee_id: format!("E-{i:06}"),
            first_name: format!("First{i}"),
            last_name: format!("Last{i}"),
            email: format!("staff{i}@bench.test"),
            phone: None,
            hire_date: "2024-01-01".parse().unwrap(),
            termination_date: None,
            status: None,
        })
        .unwrap();
    }

    (dir, company)
}

fn bench_list_staff(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_staff");
    for rows in [100usize, 1_000, 10_000] {
        let (dir, company) = seeded_directory(rows);
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::new("default_page", rows), &rows, |b, _| {
            b.iter(|| {
                let page = dir.list_staff(black_box(&ListParams::default())).unwrap();
                black_box(page.items.len())
            })
        });

        let sorted = ListParams::default()
            .sorted("last_name", SortDirection::Descending)
            .page(3, 50);
        group.bench_with_input(BenchmarkId::new("sorted_page", rows), &rows, |b, _| {
            b.iter(|| {
                let page = dir.list_staff(black_box(&sorted)).unwrap();
                black_box(page.total)
            })
        });

        let filtered = ListParams::default().filter("company_id", company.to_string());
        group.bench_with_input(BenchmarkId::new("filtered", rows), &rows, |b, _| {
            b.iter(|| {
                let page = dir.list_staff(black_box(&filtered)).unwrap();
                black_box(page.total)
            })
        });
    }
    group.finish();
}

fn bench_create_staff(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_staff");
    for rows in [100usize, 1_000] {
        group.bench_with_input(
            BenchmarkId::new("against_existing", rows),
            &rows,
            |b, &rows| {
                let (dir, company) = seeded_directory(rows);
                let department = dir
                    .list_departments(&ListParams::default())
                    .unwrap()
                    .items
                    .remove(0)
                    .department
                    .id;
                let role = dir
                    .list_roles(&ListParams::default())
                    .unwrap()
                    .items
                    .remove(0)
                    .role
                    .id;
                let mut n = 0u64;
                b.iter(|| {
                    n += 1;
                    dir.create_staff(NewStaff {
                        user_id: None,
                        company_id: company,
                        department_id: department,
                        role_id: role,
                        employee_id: format!("X-{n}"),
                        first_name: "Bench".into(),
                        last_name: "Row".into(),
                        email: format!("x{n}@bench.test"),
                        phone: None,
                        hire_date: "2024-01-01".parse().unwrap(),
                        termination_date: None,
                        status: None,
                    })
                    .unwrap()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_list_staff, bench_create_staff);
criterion_main!(benches);
