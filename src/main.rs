use docopt::Docopt;
use error_chain::bail;
use log::info;
use mazes3d::{
    cells::Cartesian3DCoordinate,
    generators,
    grid::MazeGrid,
    grid_dimensions::GridDimensions,
    masks::BinaryMask3D,
    mesh::{self, MeshBuffer, WallSize},
    pathing,
    units::{Height, Length, Width},
};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use std::{
    fs::{self, File},
    io::{self, prelude::*, BufWriter},
};

const USAGE: &str = "Mazes3D

Usage:
    mazes3d_driver -h | --help
    mazes3d_driver [--width=<w> --height=<h> --length=<l>] [--seed=<s>] [--start-x=<x> --start-y=<y> --start-z=<z>] [--wall-size=<n>] [--mask-file=<path>] [--mesh-out=<path>] [--save-edges=<path>]

Options:
    -h --help              Show this screen.
    --width=<w>            Cells along x [default: 10].
    --height=<h>           Cells along y [default: 10].
    --length=<l>           Cells along z [default: 10].
    --seed=<s>             Seed for the maze carving random number generator. Seeded from entropy if not given.
    --start-x=<x>          x coordinate of the carving start cell. Unset coordinates are 0.
    --start-y=<y>          y coordinate of the carving start cell.
    --start-z=<z>          z coordinate of the carving start cell. With no start given and a mask loaded, carving starts at the first unmasked cell.
    --wall-size=<n>        Edge length of one cell in world units [default: 1.0].
    --mask-file=<path>     Path to a text mask: '#' or 'X' masks a cell off, '.' leaves it open, one line per row and a blank line between layers. The grid takes the mask's dimensions.
    --mesh-out=<path>      Write the wall mesh as raw little-endian f32 vertex data: position xyz then attribute xyz per vertex, six vertices per wall.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_width: usize,
    flag_height: usize,
    flag_length: usize,
    flag_seed: Option<u64>,
    flag_start_x: Option<u32>,
    flag_start_y: Option<u32>,
    flag_start_z: Option<u32>,
    flag_wall_size: f32,
    flag_mask_file: String,
    flag_mesh_out: String,
    flag_save_edges: String,
}

// Errors of the driver: the library's own errors linked in, plus the foreign ones raised while
// reading arguments and writing files.
mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::mazes3d::errors::Error, ::mazes3d::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .parse_env("RUST_LOG")
        .init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let mask = if !args.flag_mask_file.is_empty() {
        Some(load_binary_mask(&args.flag_mask_file)?)
    } else {
        None
    };

    let dimensions = match mask {
        Some(ref m) => *m.dimensions(),
        None => {
            GridDimensions::new(Width(args.flag_width),
                                Height(args.flag_height),
                                Length(args.flag_length))?
        }
    };
    let wall_size = WallSize::new(args.flag_wall_size)?;
    let start = carve_start_point(&args, mask.as_ref());

    let mut rng = match args.flag_seed {
        Some(seed) => XorShiftRng::seed_from_u64(seed),
        None => XorShiftRng::from_entropy(),
    };

    let mut maze_grid = MazeGrid::new(dimensions);
    generators::recursive_backtracker(&mut maze_grid, start, &mut rng, mask.as_ref())
        .chain_err(|| format!("Failed to carve a maze from {:?}", start))?;

    let mesh = mesh::extract(&maze_grid, wall_size);

    if !args.flag_mesh_out.is_empty() {
        save_mesh(&mesh, &args.flag_mesh_out)
            .chain_err(|| format!("Failed to write mesh to file {}", args.flag_mesh_out))?;
    }

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(&maze_grid, &args.flag_save_edges)?;
    }

    let longest_path = pathing::dijkstra_longest_path::<u32>(&maze_grid, mask.as_ref())
        .unwrap_or_else(Vec::new);

    info!("{:?} maze: {} cells, {} passages, {} wall quads ({} vertices), longest path {} cells",
          dimensions,
          maze_grid.size(),
          maze_grid.links_count(),
          mesh.quads_count(),
          mesh.len(),
          longest_path.len());

    Ok(())
}

fn carve_start_point(maze_args: &MazeArgs, mask: Option<&BinaryMask3D>) -> Cartesian3DCoordinate {
    match (maze_args.flag_start_x, maze_args.flag_start_y, maze_args.flag_start_z) {
        (None, None, None) => {
            mask.and_then(|m| m.first_unmasked_coordinate())
                .unwrap_or_else(|| Cartesian3DCoordinate::new(0, 0, 0))
        }
        (x, y, z) => Cartesian3DCoordinate::new(x.unwrap_or(0), y.unwrap_or(0), z.unwrap_or(0)),
    }
}

fn load_binary_mask(file_path_str: &str) -> Result<BinaryMask3D> {
    let text = fs::read_to_string(file_path_str)
        .chain_err(|| format!("Failed to read mask file {}", file_path_str))?;
    Ok(BinaryMask3D::from_text(&text)?)
}

fn save_mesh(mesh: &MeshBuffer, file_path: &str) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(file_path)?);
    for float in mesh.as_floats() {
        f.write_all(&float.to_le_bytes())?;
    }
    f.flush()
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &MazeGrid, file_path: &str) -> Result<()> {

    let mut graph_data = String::new();
    let vertices_count = maze_grid.size();
    let edges_count = maze_grid.links_count();
    graph_data.push_str(vertices_count.to_string().as_ref());
    graph_data.push(' ');
    graph_data.push_str(edges_count.to_string().as_ref());
    graph_data.push('\n');

    let dimensions = maze_grid.dimensions();
    for (src, dst) in maze_grid.iter_links() {
        let indices = dimensions.coordinate_to_index(src)
            .and_then(|a| dimensions.coordinate_to_index(dst).map(|b| (a, b)));
        let (index_a, index_b) = match indices {
            Some(pair) => pair,
            None => {
                bail!("Links iter gave an invalid coordinate pair {:?} {:?}", src, dst);
            }
        };
        let src_as_1_based_index = index_a + 1;
        let dst_as_1_based_index = index_b + 1;

        graph_data.push_str(src_as_1_based_index.to_string().as_ref());
        graph_data.push(' ');
        graph_data.push_str(dst_as_1_based_index.to_string().as_ref());
        graph_data.push('\n');
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}

#[cfg(test)]
mod tests {

    use super::*;

    fn args(argv: &[&str]) -> MazeArgs {
        Docopt::new(USAGE)
            .and_then(|d| d.argv(argv.iter()).deserialize())
            .expect("valid arguments")
    }

    #[test]
    fn defaults() {
        let a = args(&["mazes3d_driver"]);
        assert_eq!((a.flag_width, a.flag_height, a.flag_length), (10, 10, 10));
        assert_eq!(a.flag_wall_size, 1.0);
        assert_eq!(a.flag_seed, None);
        assert_eq!(carve_start_point(&a, None), Cartesian3DCoordinate::new(0, 0, 0));
    }

    #[test]
    fn start_falls_back_to_first_unmasked_cell() {
        let mask = BinaryMask3D::from_text("#.\n..\n").unwrap();
        let a = args(&["mazes3d_driver"]);
        let start = carve_start_point(&a, Some(&mask));
        assert_eq!(start, Cartesian3DCoordinate::new(1, 0, 0));

        let mut maze_grid = MazeGrid::new(*mask.dimensions());
        let mut rng = XorShiftRng::seed_from_u64(3);
        generators::recursive_backtracker(&mut maze_grid, start, &mut rng, Some(&mask)).unwrap();
        assert_eq!(maze_grid.links_count(), 2);
    }

    #[test]
    fn explicit_start_is_kept_with_a_mask() {
        let mask = BinaryMask3D::from_text("#.\n..\n").unwrap();
        let a = args(&["mazes3d_driver", "--start-x=1", "--start-y=1"]);
        assert_eq!(carve_start_point(&a, Some(&mask)), Cartesian3DCoordinate::new(1, 1, 0));

        let origin = args(&["mazes3d_driver", "--start-z=0"]);
        assert_eq!(carve_start_point(&origin, Some(&mask)), Cartesian3DCoordinate::new(0, 0, 0));
    }
}
