//! Post collection: published listing, grouping and navigation

use indexmap::IndexMap;
use std::vec;

use super::Post;

/// Every successfully parsed post, in load order
#[derive(Debug, Clone, Default)]
pub struct PostCollection {
    posts: Vec<Post>,
}

impl PostCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, post: Post) {
        self.posts.push(post);
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// All posts, drafts included, in load order
    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.posts.iter()
    }

    pub fn get(&self, source: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.source() == source)
    }

    /// Published posts, newest first.
    ///
    /// The sort is stable, so posts sharing a date keep their load order.
    /// The returned iterator can be cloned to walk the listing again.
    pub fn listing(&self) -> Listing<'_> {
        let mut posts: Vec<&Post> = self.posts.iter().filter(|p| p.published()).collect();
        posts.sort_by(|a, b| b.date().instant().cmp(&a.date().instant()));
        Listing {
            posts: posts.into_iter(),
        }
    }

    /// Published posts grouped by tag, in listing order
    pub fn tags(&self) -> IndexMap<String, Vec<&Post>> {
        let mut groups: IndexMap<String, Vec<&Post>> = IndexMap::new();
        for post in self.listing() {
            for tag in post.tags() {
                groups.entry(tag.clone()).or_default().push(post);
            }
        }
        groups
    }

    /// Published posts grouped by category, in listing order
    pub fn categories(&self) -> IndexMap<String, Vec<&Post>> {
        let mut groups: IndexMap<String, Vec<&Post>> = IndexMap::new();
        for post in self.listing() {
            for category in post.categories() {
                groups.entry(category.clone()).or_default().push(post);
            }
        }
        groups
    }

    /// Published posts grouped by year, newest year first
    pub fn archives(&self) -> IndexMap<i32, Vec<&Post>> {
        let mut groups: IndexMap<i32, Vec<&Post>> = IndexMap::new();
        for post in self.listing() {
            groups.entry(post.date().year()).or_default().push(post);
        }
        groups
    }

    /// (newer, older) neighbours of a published post in the listing
    pub fn neighbors(&self, source: &str) -> (Option<&Post>, Option<&Post>) {
        let listed: Vec<&Post> = self.listing().collect();
        let Some(pos) = listed.iter().position(|p| p.source() == source) else {
            return (None, None);
        };
        let newer = pos.checked_sub(1).map(|i| listed[i]);
        let older = listed.get(pos + 1).copied();
        (newer, older)
    }
}

impl FromIterator<Post> for PostCollection {
    fn from_iter<I: IntoIterator<Item = Post>>(iter: I) -> Self {
        Self {
            posts: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PostCollection {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Published posts in date-descending order
#[derive(Debug, Clone)]
pub struct Listing<'a> {
    posts: vec::IntoIter<&'a Post>,
}

impl<'a> Iterator for Listing<'a> {
    type Item = &'a Post;

    fn next(&mut self) -> Option<Self::Item> {
        self.posts.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.posts.size_hint()
    }
}

impl ExactSizeIterator for Listing<'_> {}

impl DoubleEndedIterator for Listing<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.posts.next_back()
    }
}

impl std::iter::FusedIterator for Listing<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn post(source: &str, date: &str, extra: &str) -> Post {
        let doc = format!("---\ntitle: {source}\ndate: {date}\n{extra}---\nbody\n");
        Post::from_document(source, &doc, &SiteConfig::default()).unwrap()
    }

    fn sources<'a>(posts: impl Iterator<Item = &'a Post>) -> Vec<&'a str> {
        posts.map(Post::source).collect()
    }

    fn sample() -> PostCollection {
        [
            post("old.md", "2017-01-01", "tags: [cpp]\ncategories: [notes]\n"),
            post("draft.md", "2022-01-01", "published: false\ntags: [cpp]\n"),
            post("new.md", "2021-06-01", "tags: [cpp, stl]\ncategories: [notes]\n"),
            post("mid.md", "2019-03-03", "tags: [stl]\n"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_listing_sorts_newest_first_without_drafts() {
        let collection = sample();
        assert_eq!(
            sources(collection.listing()),
            vec!["new.md", "mid.md", "old.md"]
        );
        assert_eq!(collection.listing().len(), 3);
        assert_eq!(collection.len(), 4);
    }

    #[test]
    fn test_listing_is_restartable() {
        let collection = sample();
        let mut listing = collection.listing();
        let replay = listing.clone();
        listing.next();
        assert_eq!(listing.len(), 2);
        assert_eq!(replay.len(), 3);
        assert_eq!(
            sources(collection.listing()),
            sources(collection.listing())
        );
    }

    #[test]
    fn test_equal_dates_keep_load_order() {
        let collection: PostCollection = [
            post("a.md", "2020-05-05", ""),
            post("b.md", "2020-05-05", ""),
            post("c.md", "2020-05-06", ""),
            post("d.md", "2020-05-05", ""),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            sources(collection.listing()),
            vec!["c.md", "a.md", "b.md", "d.md"]
        );
    }

    #[test]
    fn test_groups_skip_drafts() {
        let collection = sample();
        let tags = collection.tags();
        assert_eq!(sources(tags["cpp"].iter().copied()), vec!["new.md", "old.md"]);
        assert_eq!(sources(tags["stl"].iter().copied()), vec!["new.md", "mid.md"]);

        let categories = collection.categories();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories["notes"].len(), 2);

        let years: Vec<i32> = collection.archives().keys().copied().collect();
        assert_eq!(years, vec![2021, 2019, 2017]);
    }

    #[test]
    fn test_neighbors() {
        let collection = sample();
        let (newer, older) = collection.neighbors("mid.md");
        assert_eq!(newer.map(Post::source), Some("new.md"));
        assert_eq!(older.map(Post::source), Some("old.md"));
        assert_eq!(collection.neighbors("draft.md"), (None, None));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn listing_is_sorted_stable_and_published(
                entries in prop::collection::vec((0u32..5, any::<bool>()), 0..24)
            ) {
                let collection: PostCollection = entries
                    .iter()
                    .enumerate()
                    .map(|(i, (day, published))| {
                        post(
                            &format!("p{i}.md"),
                            &format!("2020-01-{:02}", day + 1),
                            &format!("published: {published}\n"),
                        )
                    })
                    .collect();

                let listed: Vec<&Post> = collection.listing().collect();
                prop_assert!(listed.iter().all(|p| p.published()));
                prop_assert_eq!(
                    listed.len(),
                    entries.iter().filter(|(_, published)| *published).count()
                );
                for pair in listed.windows(2) {
                    let (a, b) = (pair[0], pair[1]);
                    prop_assert!(a.date() >= b.date());
                    if a.date() == b.date() {
                        let index = |p: &Post| p.source()[1..p.source().len() - 3].parse::<usize>().unwrap();
                        prop_assert!(index(a) < index(b));
                    }
                }
            }
        }
    }
}
