use crate::config::MAX_DIR_DEPTH;
use crate::error::MediaError;
use crate::media::MediaVolume;
use crate::types::{push_truncated, MediaPath};
use crate::workdir::{open_level, Level, WorkDir};

/// Where a dive landed: the containing directory's absolute path and the
/// leaf name the caller still has to open itself (empty when the path named
/// a directory).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Landing<'p> {
    pub dir_path: MediaPath,
    pub leaf: &'p str,
    pub in_work_dir: bool,
}

impl Landing<'_> {
    pub fn leaf_path(&self) -> MediaPath {
        let mut out = self.dir_path.clone();
        push_truncated(&mut out, self.leaf);
        out
    }
}

struct ParsedPath<'p> {
    absolute: bool,
    dirs: heapless::Vec<&'p str, MAX_DIR_DEPTH>,
    leaf: &'p str,
}

fn parse(path: &str) -> Result<ParsedPath<'_>, MediaError> {
    let absolute = path.starts_with('/');
    let names_dir = path.is_empty() || path.ends_with('/');
    let mut dirs = heapless::Vec::new();
    let mut leaf = "";
    let mut parts = path
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .peekable();
    while let Some(part) = parts.next() {
        if parts.peek().is_none() && !names_dir {
            leaf = part;
        } else if dirs.push(part).is_err() {
            return Err(MediaError::PathTooDeep);
        }
    }
    Ok(ParsedPath {
        absolute,
        dirs,
        leaf,
    })
}

/// Walks `path` component by component and hands the containing directory
/// and the leaf name to `visit`.
///
/// Relative paths start at the working directory, absolute ones at root.
/// Intermediate directories are opened on the side; with `update_cwd` the
/// working directory only changes once the whole walk and `visit` succeeded,
/// so a failure is never partially observable.
pub fn dive<V, R, T>(
    workdir: &mut WorkDir<V::File>,
    volume: &mut V,
    path: &str,
    update_cwd: bool,
    visit: T,
) -> Result<R, MediaError>
where
    V: MediaVolume,
    T: FnOnce(&mut V, &V::File, &Landing<'_>) -> Result<R, MediaError>,
{
    let parsed = parse(path)?;
    let base_depth = if parsed.absolute { 0 } else { workdir.depth() };
    if parsed.dirs.len() > MAX_DIR_DEPTH - base_depth {
        return Err(MediaError::PathTooDeep);
    }

    let mut dir_path = if parsed.absolute {
        let mut root = MediaPath::new();
        push_truncated(&mut root, "/");
        root
    } else {
        workdir.path()
    };

    let mut opened: heapless::Vec<Level<V::File>, MAX_DIR_DEPTH> = heapless::Vec::new();
    let walked = walk(workdir, volume, &parsed, &mut opened, &mut dir_path);

    let result = walked.and_then(|()| {
        let base = if parsed.absolute {
            workdir.root()
        } else {
            workdir.current()
        };
        let dir = match opened.last() {
            Some(level) => &level.file,
            None => base.ok_or(MediaError::NotMounted)?,
        };
        let in_work_dir = dir_path.eq_ignore_ascii_case(&workdir.path());
        let landing = Landing {
            dir_path,
            leaf: parsed.leaf,
            in_work_dir,
        };
        log::debug!(
            "card: dive path={} dir={} leaf={}",
            path,
            landing.dir_path,
            landing.leaf
        );
        visit(volume, dir, &landing)
    });

    match result {
        Ok(value) if update_cwd => {
            if parsed.absolute {
                workdir.reset(volume);
            }
            workdir.extend(volume, opened)?;
            Ok(value)
        }
        other => {
            for level in opened {
                volume.close(level.file);
            }
            other
        }
    }
}

fn walk<V: MediaVolume>(
    workdir: &WorkDir<V::File>,
    volume: &mut V,
    parsed: &ParsedPath<'_>,
    opened: &mut heapless::Vec<Level<V::File>, MAX_DIR_DEPTH>,
    dir_path: &mut MediaPath,
) -> Result<(), MediaError> {
    let base = if parsed.absolute {
        workdir.root()
    } else {
        workdir.current()
    };
    let base = base.ok_or(MediaError::NotMounted)?;
    for name in parsed.dirs.iter() {
        let parent = match opened.last() {
            Some(level) => &level.file,
            None => base,
        };
        let level = open_level(volume, parent, name)?;
        if dir_path.len() + level.name.len() + 1 > dir_path.capacity() {
            volume.close(level.file);
            return Err(MediaError::NameTooLong);
        }
        push_truncated(dir_path, &level.name);
        push_truncated(dir_path, "/");
        if let Err(level) = opened.push(level) {
            volume.close(level.file);
            return Err(MediaError::PathTooDeep);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_dirs_and_leaf() {
        let parsed = parse("/A/SUB/deep.g").unwrap();
        assert!(parsed.absolute);
        assert_eq!(parsed.dirs.as_slice(), &["A", "SUB"]);
        assert_eq!(parsed.leaf, "deep.g");
    }

    #[test]
    fn trailing_separator_names_a_directory() {
        let parsed = parse("A/SUB/").unwrap();
        assert!(!parsed.absolute);
        assert_eq!(parsed.dirs.as_slice(), &["A", "SUB"]);
        assert_eq!(parsed.leaf, "");
    }

    #[test]
    fn repeated_separators_collapse() {
        let parsed = parse("//A///b.gco").unwrap();
        assert_eq!(parsed.dirs.as_slice(), &["A"]);
        assert_eq!(parsed.leaf, "b.gco");
    }

    #[test]
    fn only_separators_is_root() {
        let parsed = parse("///").unwrap();
        assert!(parsed.absolute);
        assert!(parsed.dirs.is_empty());
        assert_eq!(parsed.leaf, "");
    }

    #[test]
    fn empty_path_is_current_dir() {
        let parsed = parse("").unwrap();
        assert!(!parsed.absolute);
        assert!(parsed.dirs.is_empty());
        assert_eq!(parsed.leaf, "");
    }

    #[test]
    fn too_many_components_rejected() {
        assert!(matches!(
            parse("/1/2/3/4/5/6/7/8/9/10/11/x.g"),
            Err(MediaError::PathTooDeep)
        ));
    }
}
