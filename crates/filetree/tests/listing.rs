use magview_filetree::error::ErrorKind;
use magview_filetree::widget::{MemoryWidget, feed_entries, feed_tree};
use magview_filetree::{PathEntry, TreeNode, build, serialize};

const LISTING: &[(&str, u64)] = &[
    ("ubuntu-24.04/casper/vmlinuz", 14_942_600),
    ("ubuntu-24.04/casper/initrd", 72_481_331),
    ("ubuntu-24.04/md5sum.txt", 32_768),
    ("ubuntu-24.04/boot/grub/grub.cfg", 1_024),
    ("README.diskdefines", 230),
];

fn parse(listing: &[(&str, u64)]) -> Vec<PathEntry> {
    listing.iter().map(|(path, size)| PathEntry::parse(path, *size).unwrap()).collect()
}

#[test]
fn test_listing_to_text() {
    let tree = build(&parse(LISTING));
    assert_eq!(
        serialize::to_lines(&tree),
        vec![
            "ubuntu-24.04",
            "    casper",
            "        vmlinuz",
            "        initrd",
            "    md5sum.txt",
            "    boot",
            "        grub",
            "            grub.cfg",
            "README.diskdefines",
        ]
    );
    let total: u64 = tree.iter().map(TreeNode::total_size).sum();
    assert_eq!(total, LISTING.iter().map(|(_, size)| size).sum::<u64>());
}

#[test]
fn test_listing_to_widget() {
    let entries = parse(LISTING);
    let mut flat = MemoryWidget::new();
    feed_entries(&mut flat, &entries);
    let mut built = MemoryWidget::new();
    feed_tree(&mut built, &build(&entries));

    assert_eq!(flat.render(), built.render());
    assert_eq!(flat.render()[3], "        initrd  69.1 MiB");
    assert_eq!(flat.children(Some("ubuntu-24.04")).count(), 3);
}

#[test]
fn test_malformed_entry_is_rejected_up_front() {
    let result: Result<Vec<PathEntry>, _> =
        [("ok/file", 1), ("bad//file", 2)].iter().map(|(path, size)| PathEntry::parse(path, *size)).collect();
    let err = result.unwrap_err();
    assert_eq!(*err, ErrorKind::EmptySegment("bad//file".to_string()));
}
