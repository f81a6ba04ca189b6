/// Read-through caching for async lookups.
///
/// Returns the cached value when present. Otherwise awaits `$block`, queues
/// the result for a background write with the given TTL (seconds) and
/// returns it. A failing cache read is logged and treated as a miss so that
/// Redis being down never fails the request.
///
/// # Example
/// ```rust,ignore
/// let catalog: Vec<ExerciseRecord> =
///     cached!(self.cache, CacheKey::Catalog, self.ttl, self.inner.fetch_catalog())?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => Ok(cached),
            other => {
                if let Err(e) = other {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, using source");
                }
                match $block.await {
                    Ok(value) => {
                        $cache.set_in_background(&key, &value, $ttl);
                        Ok(value)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }};
}
