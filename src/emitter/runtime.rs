//! The static runtime library text (spec §1, §4.4, component A): a fixed C
//! source blob prepended to every emitted program. It is never dynamically
//! generated — the A language's `list`, `dict`, and `tuple` types always
//! compile down to exactly this struct/function surface, so it's cheaper
//! and more predictable to inline the same text every time than to emit it
//! piecemeal per program.

pub const RUNTIME_BLOB: &str = r#"#include <stdio.h>
#include <stdlib.h>
#include <string.h>
#include <stdbool.h>
#include <time.h>

#define A_LIST_INITIAL_CAPACITY 8
#define A_DICT_MAX_ENTRIES 256

typedef struct {
    int *data;
    int size;
    int capacity;
} List;

typedef struct {
    int *data;
    int size;
} Tuple;

typedef struct {
    char *keys[A_DICT_MAX_ENTRIES];
    int values[A_DICT_MAX_ENTRIES];
    int size;
} Dict;

static List new_list(void) {
    List list;
    list.capacity = A_LIST_INITIAL_CAPACITY;
    list.size = 0;
    list.data = (int *)malloc(sizeof(int) * list.capacity);
    return list;
}

static void list_append(List *list, int value) {
    if (list->size >= list->capacity) {
        list->capacity *= 2;
        list->data = (int *)realloc(list->data, sizeof(int) * list->capacity);
    }
    list->data[list->size] = value;
    list->size += 1;
}

static Tuple new_tuple(void) {
    Tuple tuple;
    tuple.size = 0;
    tuple.data = NULL;
    return tuple;
}

static Tuple make_tuple(int *values, int count) {
    Tuple tuple;
    tuple.size = count;
    tuple.data = (int *)malloc(sizeof(int) * count);
    memcpy(tuple.data, values, sizeof(int) * count);
    return tuple;
}

static Dict new_dict(void) {
    Dict dict;
    dict.size = 0;
    return dict;
}

static void dset(Dict *dict, const char *key, int value) {
    for (int i = 0; i < dict->size; i++) {
        if (strcmp(dict->keys[i], key) == 0) {
            dict->values[i] = value;
            return;
        }
    }
    if (dict->size >= A_DICT_MAX_ENTRIES) {
        return;
    }
    dict->keys[dict->size] = strdup(key);
    dict->values[dict->size] = value;
    dict->size += 1;
}

static int dget(Dict *dict, const char *key) {
    for (int i = 0; i < dict->size; i++) {
        if (strcmp(dict->keys[i], key) == 0) {
            return dict->values[i];
        }
    }
    return 0;
}

static List slice_arr(List *list, int start, int end, int *out_len) {
    if (start < 0) start = 0;
    if (end > list->size) end = list->size;
    if (end < start) end = start;

    List sliced = new_list();
    for (int i = start; i < end; i++) {
        list_append(&sliced, list->data[i]);
    }
    *out_len = sliced.size;
    return sliced;
}

static void print_list(List *list) {
    printf("[");
    for (int i = 0; i < list->size; i++) {
        printf("%d", list->data[i]);
        if (i < list->size - 1) {
            printf(", ");
        }
    }
    printf("]\n");
}

static void print_tuple(Tuple *tuple) {
    printf("(");
    for (int i = 0; i < tuple->size; i++) {
        printf("%d", tuple->data[i]);
        if (i < tuple->size - 1) {
            printf(", ");
        }
    }
    printf(")\n");
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_blob_defines_expected_surface() {
        for symbol in [
            "typedef struct",
            "List",
            "Tuple",
            "Dict",
            "new_list",
            "new_dict",
            "new_tuple",
            "list_append",
            "slice_arr",
            "print_list",
            "print_tuple",
            "dset",
            "dget",
        ] {
            assert!(RUNTIME_BLOB.contains(symbol), "missing {symbol}");
        }
    }
}
