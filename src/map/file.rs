//! `.tmap` level container.
//!
//! ### Layout (little endian)
//! * header: magic `TMAP`, `u32` version, `u32` row stride, `u32` hero
//!   plane, `u32` colour key, `u32` plane count
//! * per plane: `u32` width, `u32` height (tiles), `u32` atlas width,
//!   `u32` atlas height (pixels), atlas pixels as `u32`, then
//!   `stride * height` block numbers as `u16`
//!
//! The whole file is decoded up front; the engine only ever sees the
//! resulting [`MapData`].

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use thiserror::Error;

use super::{MapData, MapError, PlaneLayer, TileAtlas};
use crate::renderer::Surface;

const MAGIC: &[u8; 4] = b"TMAP";
const VERSION: u32 = 1;
/// Upper bound on any single allocation driven by header fields.
const MAX_ELEMENTS: usize = 1 << 26;
/// Upper bound on the plane count.
const MAX_PLANES: u32 = 64;

/// Errors that can be encountered while reading or writing a `.tmap`.
#[derive(Error, Debug)]
pub enum MapFileError {
    /// Underlying I/O failure – propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Header magic wasn't `TMAP`.
    #[error("not a TMAP file")]
    BadMagic,

    #[error("unsupported TMAP version {0}")]
    Version(u32),

    /// A size field asks for more items than the format allows.
    #[error("corrupt TMAP: {what} of {count} elements")]
    TooLarge { what: &'static str, count: usize },

    #[error(transparent)]
    Map(#[from] MapError),
}

/// Read a level from disk.
pub fn load_map<P: AsRef<Path>>(path: P) -> Result<MapData, MapFileError> {
    read_map(&mut BufReader::new(File::open(path)?))
}

/// Write a level to disk, replacing any existing file.
pub fn save_map<P: AsRef<Path>>(path: P, map: &MapData) -> Result<(), MapFileError> {
    let mut out = BufWriter::new(File::create(path)?);
    write_map(&mut out, map)?;
    out.flush()?;
    Ok(())
}

fn checked_len(what: &'static str, a: u32, b: u32) -> Result<usize, MapFileError> {
    let count = a as usize * b as usize;
    if count > MAX_ELEMENTS {
        return Err(MapFileError::TooLarge { what, count });
    }
    Ok(count)
}

/// Decode a level from any byte stream.
pub fn read_map<R: Read>(r: &mut R) -> Result<MapData, MapFileError> {
    /*----------- 1. header ------------------------------------------*/
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(MapFileError::BadMagic);
    }
    let version = r.read_u32::<LE>()?;
    if version != VERSION {
        return Err(MapFileError::Version(version));
    }
    let stride = r.read_u32::<LE>()?;
    let hero = r.read_u32::<LE>()? as usize;
    let color_key = r.read_u32::<LE>()?;
    let plane_count = r.read_u32::<LE>()?;
    if plane_count > MAX_PLANES {
        return Err(MapFileError::TooLarge {
            what: "plane list",
            count: plane_count as usize,
        });
    }

    /*----------- 2. planes ------------------------------------------*/
    let mut planes = Vec::with_capacity(plane_count as usize);
    for plane in 0..plane_count as usize {
        let width = r.read_u32::<LE>()?;
        let height = r.read_u32::<LE>()?;
        let atlas_w = r.read_u32::<LE>()?;
        let atlas_h = r.read_u32::<LE>()?;

        let mut pixels = vec![0u32; checked_len("atlas", atlas_w, atlas_h)?];
        r.read_u32_into::<LE>(&mut pixels)?;
        let atlas = Surface::from_pixels(atlas_w as usize, atlas_h as usize, pixels)
            .and_then(TileAtlas::new)
            .ok_or(MapError::RaggedAtlas(plane))?;

        let mut blocks = vec![0u16; checked_len("block grid", stride, height)?];
        r.read_u16_into::<LE>(&mut blocks)?;

        planes.push(PlaneLayer {
            width: width as i32,
            height: height as i32,
            atlas,
            blocks,
        });
    }

    Ok(MapData::new(stride as usize, hero, color_key, planes)?)
}

/// Encode `map` in the layout documented at the top of this module.
pub fn write_map<W: Write>(w: &mut W, map: &MapData) -> Result<(), MapFileError> {
    w.write_all(MAGIC)?;
    w.write_u32::<LE>(VERSION)?;
    w.write_u32::<LE>(map.stride() as u32)?;
    w.write_u32::<LE>(super::MapStore::hero_plane(map) as u32)?;
    w.write_u32::<LE>(super::MapStore::color_key(map))?;
    w.write_u32::<LE>(map.planes().len() as u32)?;

    for p in map.planes() {
        let sheet = p.atlas.sheet();
        w.write_u32::<LE>(p.width as u32)?;
        w.write_u32::<LE>(p.height as u32)?;
        w.write_u32::<LE>(sheet.width() as u32)?;
        w.write_u32::<LE>(sheet.height() as u32)?;
        for &px in sheet.as_slice() {
            w.write_u32::<LE>(px)?;
        }
        // only the rows the plane owns; MapData may hold a longer grid
        let needed = map.stride() * p.height as usize;
        for &b in &p.blocks[..needed] {
            w.write_u16::<LE>(b)?;
        }
    }
    Ok(())
}

// ==========================================================================
// Unit tests
// ==========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{DemoLevel, MapStore, demo_map};

    #[test]
    fn demo_level_survives_disk() {
        let map = demo_map(&DemoLevel::default()).unwrap();
        let tmp = tempfile::NamedTempFile::new().expect("tempfile");
        save_map(tmp.path(), &map).unwrap();

        let back = load_map(tmp.path()).unwrap();
        assert_eq!(back.plane_count(), map.plane_count());
        assert_eq!(back.hero_plane(), map.hero_plane());
        assert_eq!(back.color_key(), map.color_key());
        for plane in 0..map.plane_count() {
            let (w, h) = map.plane_extent(plane);
            assert_eq!(back.plane_extent(plane), (w, h));
            assert_eq!(back.atlas(plane), map.atlas(plane));
            assert_eq!(back.block(plane, w - 1, h - 1), map.block(plane, w - 1, h - 1));
        }
    }

    #[test]
    fn rejects_garbage() {
        let err = read_map(&mut &b"NOTMAP__"[..]).unwrap_err();
        assert!(matches!(err, MapFileError::BadMagic));
    }

    #[test]
    fn rejects_future_version() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend(&7u32.to_le_bytes());
        let err = read_map(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, MapFileError::Version(7)));
    }

    #[test]
    fn huge_atlas_header_is_refused_before_allocating() {
        // Hand-craft: header + one plane whose atlas claims 65536x65536 px.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        for v in [VERSION, 4, 0, 0, 1, 4, 4, 65_536, 65_536] {
            bytes.extend(&v.to_le_bytes());
        }
        let err = read_map(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, MapFileError::TooLarge { what: "atlas", .. }));
    }

    #[test]
    fn huge_plane_count_is_refused_before_allocating() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        for v in [VERSION, 4, 0, 0, 1 << 26] {
            bytes.extend(&v.to_le_bytes());
        }
        let err = read_map(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            MapFileError::TooLarge { what: "plane list", count } if count == 1 << 26
        ));
    }

    #[test]
    fn truncated_file_is_io_error() {
        let map = demo_map(&DemoLevel::default()).unwrap();
        let mut bytes = Vec::new();
        write_map(&mut bytes, &map).unwrap();
        bytes.truncate(bytes.len() / 2);
        let err = read_map(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, MapFileError::Io(_)));
    }
}
