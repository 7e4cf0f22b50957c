use std::{
    hash::{Hash, Hasher},
    io::{BufWriter, Write},
    path::Path,
};

use fxhash::FxHasher64;

use crate::{travel_matrices::TravelMatrices, travel_matrix_provider::TravelMatrixProvider};

const CACHE_FOLDER_ENV_VAR: &str = "STOPOVER_CACHE_FOLDER";

/// Storage for fetched matrices, keyed by (points, provider). Lets repeated
/// runs over the same locations skip the network.
pub trait MatricesCache {
    fn cache<P>(
        &self,
        provider: &TravelMatrixProvider,
        points: &[P],
        matrices: &TravelMatrices,
    ) -> Result<(), anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>;

    fn get_cached<P>(
        &self,
        provider: &TravelMatrixProvider,
        points: &[P],
    ) -> Result<Option<TravelMatrices>, anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>;
}

fn hash_points<H, P>(points: &[P], hasher: &mut H)
where
    H: Hasher,
    for<'a> &'a P: Into<geo_types::Point>,
{
    points.len().hash(hasher);
    for point in points {
        let point: geo_types::Point = point.into();
        hasher.write_u64(point.x().to_bits());
        hasher.write_u64(point.y().to_bits());
    }
}

fn get_filename<P>(points: &[P], provider: &TravelMatrixProvider) -> String
where
    for<'a> &'a P: Into<geo_types::Point>,
{
    let mut hasher = FxHasher64::default();

    hash_points(points, &mut hasher);
    provider.hash(&mut hasher);

    let hash = hasher.finish();
    format!("{:016x}.json", hash)
}

/// Cache backed by the folder named in `STOPOVER_CACHE_FOLDER`.
#[derive(Default)]
pub struct FileCache;

impl MatricesCache for FileCache {
    fn cache<P>(
        &self,
        provider: &TravelMatrixProvider,
        points: &[P],
        matrices: &TravelMatrices,
    ) -> Result<(), anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let cache_folder_path = std::env::var(CACHE_FOLDER_ENV_VAR)?;

        let cache_folder = Path::new(&cache_folder_path);

        if !cache_folder.is_dir() {
            return Err(anyhow::anyhow!(format!(
                "Path {} is not a directory",
                cache_folder_path
            )));
        }

        let filename = get_filename(points, provider);

        let file = std::fs::File::create(cache_folder.join(filename))?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        serde_json::to_writer(&mut writer, &matrices)?;
        writer.flush()?;

        Ok(())
    }

    fn get_cached<P>(
        &self,
        provider: &TravelMatrixProvider,
        points: &[P],
    ) -> Result<Option<TravelMatrices>, anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let cache_folder_path = std::env::var(CACHE_FOLDER_ENV_VAR)?;

        let cache_folder = Path::new(&cache_folder_path);
        let filename = get_filename(points, provider);
        let path = cache_folder.join(filename);

        if !path.is_file() {
            return Ok(None);
        }

        let file = std::fs::File::open(path)?;
        let matrices: TravelMatrices = serde_json::from_reader(file)?;

        Ok(Some(matrices))
    }
}

/// Cache that never stores anything.
#[derive(Default)]
pub struct NoCache;

impl MatricesCache for NoCache {
    fn cache<P>(
        &self,
        _provider: &TravelMatrixProvider,
        _points: &[P],
        _matrices: &TravelMatrices,
    ) -> Result<(), anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        Ok(())
    }

    fn get_cached<P>(
        &self,
        _provider: &TravelMatrixProvider,
        _points: &[P],
    ) -> Result<Option<TravelMatrices>, anyhow::Error>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        Ok(None)
    }
}
