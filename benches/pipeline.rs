use criterion::{black_box, criterion_group, criterion_main, Criterion};
use opencv::core::{Mat, Point, Scalar, CV_8UC1};
use opencv::imgproc;
use opencv::prelude::*;
use spot_match::config::ObjectExtractionConfig;
use spot_match::detection::{CardRectifier, ObjectExtractor, RegionFilter, RegionProperties};

fn synthetic_card(side: i32) -> Mat {
    let mut card = Mat::zeros(side, side, CV_8UC1).unwrap().to_mat().unwrap();
    imgproc::circle(
        &mut card,
        Point::new(side / 2, side / 2),
        side / 6,
        Scalar::all(220.0),
        imgproc::FILLED,
        imgproc::LINE_8,
        0,
    )
    .unwrap();
    imgproc::circle(
        &mut card,
        Point::new(side / 3, side / 3),
        side / 10,
        Scalar::all(180.0),
        2,
        imgproc::LINE_8,
        0,
    )
    .unwrap();
    card
}

fn bench_region_filter(c: &mut Criterion) {
    let filter = RegionFilter::new(16.0, 50_000.0, 112.5);
    let center = Point::new(125, 125);
    let contour: opencv::core::Vector<Point> = opencv::core::Vector::from_slice(&[
        Point::new(100, 100),
        Point::new(140, 100),
        Point::new(140, 130),
        Point::new(100, 130),
    ]);

    c.bench_function("region_filter_accepts", |b| {
        b.iter(|| {
            let props = RegionProperties::from_contour(black_box(&contour)).unwrap();
            black_box(filter.accepts(&props, center))
        })
    });
}

fn bench_rectify(c: &mut Criterion) {
    let rectifier = CardRectifier::new(250).unwrap();
    let cards = vec![synthetic_card(180), synthetic_card(320)];

    c.bench_function("rectify_two_cards", |b| {
        b.iter(|| black_box(rectifier.uniform_size(black_box(&cards)).unwrap()))
    });
}

fn bench_extract_objects(c: &mut Criterion) {
    let extractor = ObjectExtractor::new(ObjectExtractionConfig::default());
    let card = synthetic_card(250);

    c.bench_function("extract_objects", |b| {
        b.iter(|| black_box(extractor.extract_objects(black_box(&card), None).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_region_filter,
    bench_rectify,
    bench_extract_objects
);
criterion_main!(benches);
