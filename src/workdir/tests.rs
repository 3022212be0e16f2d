use super::WorkDir;
use crate::config::MAX_DIR_DEPTH;
use crate::error::MediaError;
use crate::media::MediaVolume;
use crate::path::dive;
use crate::testing::{sample_volume, MemFile, MemVolume};

fn mounted(mut volume: MemVolume) -> (MemVolume, WorkDir<MemFile>) {
    let mut workdir = WorkDir::new();
    let root = volume.mount().unwrap();
    assert!(workdir.attach_root(root).is_none());
    (volume, workdir)
}

fn deep_volume(levels: usize) -> MemVolume {
    let mut volume = MemVolume::new();
    let mut path = std::string::String::new();
    for level in 0..levels {
        path.push_str(&format!("/D{}", level));
        volume = volume.dir(&path);
    }
    volume
}

#[test]
fn descend_and_ascend_track_depth_and_names() {
    let (mut volume, mut workdir) = mounted(sample_volume());
    assert!(workdir.is_root());
    assert_eq!(workdir.current_name().as_str(), "/");

    workdir.descend(&mut volume, "a").unwrap();
    workdir.descend(&mut volume, "sub").unwrap();
    assert_eq!(workdir.depth(), 2);
    assert_eq!(workdir.current_name().as_str(), "SUB");
    assert_eq!(workdir.path().as_str(), "/A/SUB/");
    assert_eq!(volume.open_handles, 3);

    assert_eq!(workdir.ascend(&mut volume), 1);
    assert_eq!(volume.open_handles, 2);
    assert_eq!(workdir.ascend(&mut volume), 0);
    assert_eq!(workdir.ascend(&mut volume), 0);
    assert!(workdir.is_root());
    assert_eq!(volume.open_handles, 1);
}

#[test]
fn reset_closes_every_level_but_root() {
    let (mut volume, mut workdir) = mounted(sample_volume());
    workdir.descend(&mut volume, "A").unwrap();
    workdir.descend(&mut volume, "SUB").unwrap();
    workdir.reset(&mut volume);
    assert!(workdir.is_root());
    assert_eq!(volume.open_handles, 1);

    workdir.detach(&mut volume);
    assert!(!workdir.has_root());
    assert_eq!(volume.open_handles, 0);
}

#[test]
fn failed_descend_leaves_stack_unchanged() {
    let (mut volume, mut workdir) = mounted(sample_volume());
    workdir.descend(&mut volume, "A").unwrap();

    assert_eq!(
        workdir.descend(&mut volume, "missing"),
        Err(MediaError::NotFound)
    );
    assert_eq!(
        workdir.descend(&mut volume, "part.gcode"),
        Err(MediaError::NotADirectory)
    );
    assert_eq!(workdir.depth(), 1);
    assert_eq!(workdir.path().as_str(), "/A/");
    assert_eq!(volume.open_handles, 2);
}

#[test]
fn descend_past_bound_is_rejected() {
    let (mut volume, mut workdir) = mounted(deep_volume(MAX_DIR_DEPTH + 1));
    for level in 0..MAX_DIR_DEPTH {
        workdir
            .descend(&mut volume, &format!("D{}", level))
            .unwrap();
    }
    let before = workdir.path();
    let handles = volume.open_handles;

    assert_eq!(
        workdir.descend(&mut volume, &format!("D{}", MAX_DIR_DEPTH)),
        Err(MediaError::PathTooDeep)
    );
    assert_eq!(workdir.depth(), MAX_DIR_DEPTH);
    assert_eq!(workdir.path(), before);
    assert_eq!(volume.open_handles, handles);
}

#[test]
fn descend_without_root_reports_not_mounted() {
    let mut volume = sample_volume();
    let mut workdir: WorkDir<MemFile> = WorkDir::new();
    assert_eq!(
        workdir.descend(&mut volume, "A"),
        Err(MediaError::NotMounted)
    );
}

#[test]
fn read_only_dive_never_moves_the_work_dir() {
    let (mut volume, mut workdir) = mounted(sample_volume());
    workdir.descend(&mut volume, "A").unwrap();
    let before = workdir.path();

    let paths = [
        "/A/SUB/deep.g",
        "SUB/deep.g",
        "SUB/",
        "/missing/x.g",
        "SUB/missing/x.g",
        "/a.gco/x.g",
        "",
        "///",
    ];
    for path in paths {
        let _ = dive(&mut workdir, &mut volume, path, false, |_, _, landing| {
            Ok(landing.leaf_path())
        });
        assert_eq!(workdir.path(), before, "path {}", path);
        assert_eq!(volume.open_handles, 2, "path {}", path);
    }
}

#[test]
fn dive_reports_containing_dir_and_leaf() {
    let (mut volume, mut workdir) = mounted(sample_volume());
    let landing = dive(&mut workdir, &mut volume, "/a/sub/deep.g", false, |_, _, landing| {
        Ok(landing.clone().dir_path)
    })
    .unwrap();
    assert_eq!(landing.as_str(), "/A/SUB/");

    let size = dive(&mut workdir, &mut volume, "A/part.gcode", false, |volume, dir, landing| {
        let file = volume.open(dir, landing.leaf, crate::media::OpenMode::Read)?;
        let size = volume.size(&file);
        volume.close(file);
        Ok(size)
    })
    .unwrap();
    assert_eq!(size, 10);
    assert_eq!(volume.open_handles, 1);
}

#[test]
fn updating_dive_commits_only_on_success() {
    let (mut volume, mut workdir) = mounted(sample_volume());
    dive(&mut workdir, &mut volume, "/A/SUB/deep.g", true, |_, _, _| Ok(())).unwrap();
    assert_eq!(workdir.path().as_str(), "/A/SUB/");

    let failed = dive(&mut workdir, &mut volume, "/A/nothing/x.g", true, |_, _, _| Ok(()));
    assert_eq!(failed, Err(MediaError::NotFound));
    assert_eq!(workdir.path().as_str(), "/A/SUB/");

    let rejected = dive(&mut workdir, &mut volume, "/A/", true, |_, _, _| {
        Err::<(), _>(MediaError::Io)
    });
    assert_eq!(rejected, Err(MediaError::Io));
    assert_eq!(workdir.path().as_str(), "/A/SUB/");
    assert_eq!(volume.open_handles, 3);

    dive(&mut workdir, &mut volume, "/", true, |_, _, _| Ok(())).unwrap();
    assert!(workdir.is_root());
    assert_eq!(volume.open_handles, 1);
}

#[test]
fn relative_dive_past_bound_is_rejected() {
    let (mut volume, mut workdir) = mounted(deep_volume(MAX_DIR_DEPTH + 1));
    for level in 0..MAX_DIR_DEPTH - 1 {
        workdir
            .descend(&mut volume, &format!("D{}", level))
            .unwrap();
    }
    let path = format!("D{}/D{}/", MAX_DIR_DEPTH - 1, MAX_DIR_DEPTH);
    let result = dive(&mut workdir, &mut volume, &path, true, |_, _, _| Ok(()));
    assert_eq!(result, Err(MediaError::PathTooDeep));
    assert_eq!(workdir.depth(), MAX_DIR_DEPTH - 1);
}
