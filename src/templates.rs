use maud::{DOCTYPE, Markup, html};

use crate::entities::movie;
use crate::models::{SeriesTree, iso_timestamp};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub fn admin_page(movies: &[movie::Model], series: &[SeriesTree]) -> String {
    page(
        "Media Database Admin",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-5xl mx-auto px-6 py-10 space-y-10" {
                    h1 class="text-3xl font-bold text-gray-900" { "Media Database Admin" }
                    p class="text-gray-600" {
                        (movies.len()) " movies, " (series.len()) " TV series. "
                        "Manage entries through the " code { "/api/admin" } " endpoints."
                    }

                    section {
                        h2 class="text-xl font-semibold text-gray-900" { "Movies" }
                        @if movies.is_empty() {
                            p class="mt-2 text-gray-500" { "No movies yet." }
                        } @else {
                            table class="mt-4 w-full text-sm bg-white shadow rounded" {
                                thead {
                                    tr {
                                        th { "ID" } th { "TMDB" } th { "Title" }
                                        th { "Language" } th { "Added" }
                                    }
                                }
                                tbody {
                                    @for m in movies {
                                        tr {
                                            td { (m.id) }
                                            td { (m.tmdb_id) }
                                            td { (m.title) }
                                            td { (m.language.as_deref().unwrap_or("")) }
                                            td { (iso_timestamp(m.created_at).unwrap_or_default()) }
                                        }
                                    }
                                }
                            }
                        }
                    }

                    section {
                        h2 class="text-xl font-semibold text-gray-900" { "TV series" }
                        @if series.is_empty() {
                            p class="mt-2 text-gray-500" { "No TV series yet." }
                        } @else {
                            table class="mt-4 w-full text-sm bg-white shadow rounded" {
                                thead {
                                    tr {
                                        th { "ID" } th { "TMDB" } th { "Title" }
                                        th { "Seasons" } th { "Episodes" }
                                    }
                                }
                                tbody {
                                    @for tree in series {
                                        tr {
                                            td { (tree.series.id) }
                                            td { (tree.series.tmdb_id) }
                                            td { (tree.series.title) }
                                            td { (tree.seasons.len()) }
                                            td { (tree.total_episodes()) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}
