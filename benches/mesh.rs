use criterion::{criterion_group, criterion_main, Criterion};
use mazes3d::{
    cells::Cartesian3DCoordinate,
    directions::Direction,
    generators,
    grid::MazeGrid,
    grid_dimensions::GridDimensions,
    mesh::{self, WallSize},
    units::{Height, Length, Width},
};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

fn carved_cube_grid(side: usize) -> MazeGrid {
    let mut g = MazeGrid::new(GridDimensions::new(Width(side), Height(side), Length(side)).unwrap());
    let mut rng = XorShiftRng::seed_from_u64(side as u64);
    generators::carve(&mut g, Cartesian3DCoordinate::new(0, 0, 0), &mut rng).unwrap();
    g
}

fn bench_wall_quad(c: &mut Criterion) {
    let coord = Cartesian3DCoordinate::new(3, 4, 5);
    c.bench_function("wall_quad", move |b| {
        b.iter(|| mesh::wall_quad(coord, Direction::West, WallSize::default()))
    });
}

fn bench_extract_10(c: &mut Criterion) {
    let g = carved_cube_grid(10);
    c.bench_function("extract_10", move |b| {
        b.iter(|| mesh::extract(&g, WallSize::default()))
    });
}

fn bench_extract_40(c: &mut Criterion) {
    let g = carved_cube_grid(40);
    c.bench_function("extract_40", move |b| {
        b.iter(|| mesh::extract(&g, WallSize::default()))
    });
}

criterion_group!(benches, bench_wall_quad, bench_extract_10, bench_extract_40);
criterion_main!(benches);
