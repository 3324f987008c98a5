use url::Url;

/// Appends `sub_path` to the path of a control URI.
///
/// Unlike `Url::join`, the last segment of `base` is kept, so
/// `http://gnb/api` + `ps/handover-request` gives `http://gnb/api/ps/handover-request`.
pub fn join_path(base: &Url, sub_path: &str) -> Option<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(sub_path.split('/').filter(|s| !s.is_empty()));
    Some(url)
}
