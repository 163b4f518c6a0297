//! Integration tests for manifest interpretation over a synthetic install

use std::fs;
use std::path::Path;

use rwscene_core::Error;
use rwscene_parsers::text::dat::ManifestInterpreter;
use rwscene_parsers::version::GameVersion;

/// Lay out a minimal install root with a data/ directory
fn install_root() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("data")).unwrap();
    root
}

fn write(root: &Path, rel: &str, content: &str) {
    fs::write(root.join(rel), content).unwrap();
}

#[test]
fn manifest_dispatch_loads_ide_and_ipl() {
    let root = install_root();
    write(
        root.path(),
        "data/default.dat",
        "# comment line\n\
         \n\
         IDE data/a.ide\n\
         IPL data/b.ipl\n\
         SPLASH loadscreen\n\
         FOOBAR something\n",
    );
    write(root.path(), "data/a.ide", "objs\n101, LODhouse, suburb, 1, 300, 0\nend\n");
    write(
        root.path(),
        "data/b.ipl",
        "inst\n101, LODhouse, 1, 2, 3, 1, 1, 1, 0, 0, 0, 1\nend\n",
    );

    let mut interp = ManifestInterpreter::new(root.path(), GameVersion::Gta3);
    interp.interpret("data/default.dat").unwrap();

    assert_eq!(interp.definitions().len(), 1);
    assert_eq!(interp.definitions()[&101].model_name, "LODhouse");
    assert_eq!(interp.placements().len(), 1);

    // Exactly one unsupported command: SPLASH is on the ignore list.
    assert_eq!(interp.unsupported_commands(), ["FOOBAR"]);
}

#[test]
fn texdiction_is_recognized_but_inert() {
    let root = install_root();
    write(root.path(), "data/default.dat", "TEXDICTION models/generic.txd\n");

    let mut interp = ManifestInterpreter::new(root.path(), GameVersion::Gta3);
    interp.interpret("data/default.dat").unwrap();

    assert!(interp.unsupported_commands().is_empty());
    assert!(interp.definitions().is_empty());
}

#[test]
fn duplicate_definition_ids_keep_the_later_record() {
    let root = install_root();
    write(
        root.path(),
        "data/default.dat",
        "IDE data/first.ide\nIDE data/second.ide\n",
    );
    write(root.path(), "data/first.ide", "objs\n7, LODold, oldtex, 1, 300, 0\nend\n");
    write(root.path(), "data/second.ide", "objs\n7, LODnew, newtex, 1, 300, 0\nend\n");

    let mut interp = ManifestInterpreter::new(root.path(), GameVersion::Gta3);
    interp.interpret("data/default.dat").unwrap();

    assert_eq!(interp.duplicate_definitions(), 1);
    assert_eq!(interp.definitions()[&7].model_name, "LODnew");
}

#[test]
fn duplicate_definition_ids_within_one_file_are_counted() {
    let root = install_root();
    write(root.path(), "data/default.dat", "IDE data/twice.ide\n");
    write(
        root.path(),
        "data/twice.ide",
        "objs\n7, LODold, oldtex, 1, 300, 0\n7, LODnew, newtex, 1, 300, 0\nend\n",
    );

    let mut interp = ManifestInterpreter::new(root.path(), GameVersion::Gta3);
    interp.interpret("data/default.dat").unwrap();

    assert_eq!(interp.duplicate_definitions(), 1);
    assert_eq!(interp.definitions()[&7].model_name, "LODnew");
}

#[test]
fn missing_delegated_file_is_fatal() {
    let root = install_root();
    write(root.path(), "data/default.dat", "IDE data/absent.ide\n");

    let mut interp = ManifestInterpreter::new(root.path(), GameVersion::Gta3);
    let err = interp.interpret("data/default.dat").unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));
}

#[test]
fn command_without_argument_is_a_manifest_error() {
    let root = install_root();
    write(root.path(), "data/default.dat", "IDE\n");

    let mut interp = ManifestInterpreter::new(root.path(), GameVersion::Gta3);
    let err = interp.interpret("data/default.dat").unwrap_err();
    assert!(matches!(err, Error::ManifestParse { line: 1, .. }));
}

#[test]
fn backslash_arguments_resolve_on_any_platform() {
    let root = install_root();
    fs::create_dir_all(root.path().join("data/maps")).unwrap();
    write(root.path(), "data/default.dat", "IPL data\\maps\\city.ipl\n");
    write(
        root.path(),
        "data/maps/city.ipl",
        "inst\n5, lodcity, 0, 0, 0, 1, 1, 1, 0, 0, 0, 1\nend\n",
    );

    let mut interp = ManifestInterpreter::new(root.path(), GameVersion::Gta3);
    interp.interpret("data/default.dat").unwrap();
    assert_eq!(interp.placements().len(), 1);
}

#[test]
fn manifests_accumulate_in_order() {
    let root = install_root();
    write(root.path(), "data/default.dat", "IPL data/first.ipl\n");
    write(root.path(), "data/gta3.dat", "IPL data/second.ipl\n");
    write(
        root.path(),
        "data/first.ipl",
        "inst\n1, lodone, 0, 0, 0, 1, 1, 1, 0, 0, 0, 1\nend\n",
    );
    write(
        root.path(),
        "data/second.ipl",
        "inst\n2, lodtwo, 0, 0, 0, 1, 1, 1, 0, 0, 0, 1\nend\n",
    );

    let mut interp = ManifestInterpreter::new(root.path(), GameVersion::Gta3);
    interp.interpret("data/default.dat").unwrap();
    interp.interpret("data/gta3.dat").unwrap();

    let names: Vec<_> = interp.placements().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["lodone", "lodtwo"]);
}
